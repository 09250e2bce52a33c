use serde::{Deserialize, Serialize};

use catalog::CityRecord;
use foundation::GeoPoint;
use foundation::math::haversine_distance_km;

/// Nearest vertex of a polyline to a query point.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathProximity {
    pub point: GeoPoint,
    pub distance_km: f64,
    /// `None` only for an empty polyline, where `point` is meaningless and
    /// `distance_km` is `+inf`.
    pub index: Option<usize>,
}

impl PathProximity {
    pub const EMPTY: PathProximity = PathProximity {
        point: GeoPoint::new(0.0, 0.0),
        distance_km: f64::INFINITY,
        index: None,
    };

    pub fn is_empty(&self) -> bool {
        self.index.is_none()
    }
}

/// Returns (index, distance km) of the point closest to `target`.
///
/// Strict `<` keeps the first of equally distant points.
pub fn nearest_point<I>(points: I, target: GeoPoint) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = GeoPoint>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.into_iter().enumerate() {
        let d = haversine_distance_km(target, p);
        if best.map(|(_, bd)| d < bd).unwrap_or(true) {
            best = Some((i, d));
        }
    }
    best
}

/// Nearest-vertex (not nearest-segment) distance from `query` to `polyline`.
pub fn closest_point_on_polyline(query: GeoPoint, polyline: &foundation::Polyline) -> PathProximity {
    match nearest_point(polyline.points(), query) {
        Some((i, distance_km)) => PathProximity {
            point: polyline.get(i).unwrap_or(PathProximity::EMPTY.point),
            distance_km,
            index: Some(i),
        },
        None => PathProximity::EMPTY,
    }
}

#[derive(Debug, Copy, Clone)]
pub struct NearestCity<'a> {
    pub city: &'a CityRecord,
    pub distance_km: f64,
}

pub fn nearest_city(query: GeoPoint, cities: &[CityRecord]) -> Option<NearestCity<'_>> {
    let (i, distance_km) = nearest_point(cities.iter().map(|c| c.point), query)?;
    Some(NearestCity {
        city: &cities[i],
        distance_km,
    })
}
