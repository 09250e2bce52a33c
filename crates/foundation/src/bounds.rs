use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Latitude/longitude bounding box in degrees (inclusive on every edge).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBounds {
    pub fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Self {
        GeoBounds {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    /// Smallest box holding every point, or `None` for an empty input.
    pub fn from_points<I: IntoIterator<Item = GeoPoint>>(points: I) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut b = GeoBounds::new(first.lat, first.lat, first.lng, first.lng);
        for p in it {
            b.min_lat = b.min_lat.min(p.lat);
            b.max_lat = b.max_lat.max(p.lat);
            b.min_lng = b.min_lng.min(p.lng);
            b.max_lng = b.max_lng.max(p.lng);
        }
        Some(b)
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat >= self.min_lat && p.lat <= self.max_lat && p.lng >= self.min_lng && p.lng <= self.max_lng
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    pub fn is_valid(&self) -> bool {
        self.min_lat <= self.max_lat && self.min_lng <= self.max_lng
    }
}
