use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::geodesy::haversine_distance_km;

/// Geographic coordinate in decimal degrees.
///
/// Plain value type used as the coordinate currency across the workspace.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build from a `[lng, lat]` pair, the vertex order used by polylines.
    pub const fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[1],
            lng: pair[0],
        }
    }

    pub const fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ns = if self.lat < 0.0 { 'S' } else { 'N' };
        let ew = if self.lng < 0.0 { 'W' } else { 'E' };
        write!(
            f,
            "{:.3}°{ns}, {:.3}°{ew}",
            self.lat.abs(),
            self.lng.abs()
        )
    }
}

/// Ordered `[lng, lat]` vertices of a path (central line or limit).
///
/// Order is meaningful and vertices are never deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline(Vec<[f64; 2]>);

impl Polyline {
    pub fn new(vertices: Vec<[f64; 2]>) -> Self {
        Self(vertices)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_lng_lat(&self) -> &[[f64; 2]] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<GeoPoint> {
        self.0.get(index).copied().map(GeoPoint::from_lng_lat)
    }

    pub fn points(&self) -> impl DoubleEndedIterator<Item = GeoPoint> + ExactSizeIterator + '_ {
        self.0.iter().copied().map(GeoPoint::from_lng_lat)
    }

    /// Insert vertices so no two neighbours are more than `max_step_km` apart.
    ///
    /// Original vertices are kept in place; new ones are interpolated linearly
    /// in lng/lat. A non-positive or non-finite step returns a plain copy.
    pub fn resample(&self, max_step_km: f64) -> Polyline {
        if !(max_step_km.is_finite() && max_step_km > 0.0) || self.0.len() < 2 {
            return self.clone();
        }
        let mut out = Vec::with_capacity(self.0.len());
        out.push(self.0[0]);
        for pair in self.0.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let span = haversine_distance_km(GeoPoint::from_lng_lat(a), GeoPoint::from_lng_lat(b));
            let steps = (span / max_step_km).ceil().max(1.0) as usize;
            for i in 1..steps {
                let t = i as f64 / steps as f64;
                out.push([a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]);
            }
            out.push(b);
        }
        Polyline(out)
    }
}

impl From<Vec<[f64; 2]>> for Polyline {
    fn from(vertices: Vec<[f64; 2]>) -> Self {
        Self(vertices)
    }
}

impl FromIterator<GeoPoint> for Polyline {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        Self(iter.into_iter().map(GeoPoint::to_lng_lat).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error("{axis} is empty")]
    Empty { axis: &'static str },
    #[error("{axis} is not a number: {raw:?}")]
    NotANumber { axis: &'static str, raw: String },
}

/// Parse manually entered latitude/longitude text.
///
/// Anything that is not a finite decimal number is rejected; callers keep
/// their previous state on error. Degrees outside the usual range pass
/// through untouched.
pub fn parse_coordinates(lat: &str, lng: &str) -> Result<GeoPoint, CoordinateError> {
    let lat = parse_axis("latitude", lat)?;
    let lng = parse_axis("longitude", lng)?;
    Ok(GeoPoint::new(lat, lng))
}

/// Parse a single `"lat,lng"` string.
pub fn parse_lat_lng_pair(raw: &str) -> Result<GeoPoint, CoordinateError> {
    let (lat, lng) = raw.split_once(',').ok_or(CoordinateError::NotANumber {
        axis: "coordinate pair",
        raw: raw.to_string(),
    })?;
    parse_coordinates(lat, lng)
}

fn parse_axis(axis: &'static str, raw: &str) -> Result<f64, CoordinateError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoordinateError::Empty { axis });
    }
    let value: f64 = trimmed.parse().map_err(|_| CoordinateError::NotANumber {
        axis,
        raw: trimmed.to_string(),
    })?;
    if !value.is_finite() {
        return Err(CoordinateError::NotANumber {
            axis,
            raw: trimmed.to_string(),
        });
    }
    Ok(value)
}
