//! Spherical Web Mercator (XYZ tile scheme) projection helpers.
//!
//! Tile coordinates are fractional: the integer part selects a tile at the
//! given zoom and the fraction is the position inside it. Latitude inputs
//! must stay within `|lat| < MAX_MERCATOR_LAT`; the formulas blow up toward
//! the poles and are not guarded.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Edge length of a raster tile in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude at which the Web Mercator square ends.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

#[inline]
fn world_tiles(zoom: f64) -> f64 {
    zoom.exp2()
}

pub fn lng_to_tile_x(lng: f64, zoom: f64) -> f64 {
    ((lng + 180.0) / 360.0) * world_tiles(zoom)
}

pub fn lat_to_tile_y(lat: f64, zoom: f64) -> f64 {
    let lat_rad = lat.to_radians();
    let merc = (lat_rad.tan() + 1.0 / lat_rad.cos()).ln();
    ((1.0 - merc / std::f64::consts::PI) / 2.0) * world_tiles(zoom)
}

pub fn tile_x_to_lng(x: f64, zoom: f64) -> f64 {
    (x / world_tiles(zoom)) * 360.0 - 180.0
}

pub fn tile_y_to_lat(y: f64, zoom: f64) -> f64 {
    let n = std::f64::consts::PI - 2.0 * std::f64::consts::PI * y / world_tiles(zoom);
    n.sinh().atan().to_degrees()
}

/// Fractional tile-space position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TilePoint {
    pub x: f64,
    pub y: f64,
}

pub fn geo_to_tile(point: GeoPoint, zoom: f64) -> TilePoint {
    TilePoint {
        x: lng_to_tile_x(point.lng, zoom),
        y: lat_to_tile_y(point.lat, zoom),
    }
}

pub fn tile_to_geo(tile: TilePoint, zoom: f64) -> GeoPoint {
    GeoPoint::new(tile_y_to_lat(tile.y, zoom), tile_x_to_lng(tile.x, zoom))
}

/// Pixel position relative to the top-left corner of the viewport.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: ScreenPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Viewport dimensions in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn half(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Whether `p` lies inside the viewport grown by `margin` pixels on every side.
    pub fn contains_with_margin(&self, p: ScreenPoint, margin: f64) -> bool {
        p.x >= -margin && p.x <= self.width + margin && p.y >= -margin && p.y <= self.height + margin
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Project a geographic point to viewport pixels for a view centred on `center`.
pub fn geo_to_screen(point: GeoPoint, center: GeoPoint, zoom: f64, viewport: Viewport) -> ScreenPoint {
    let c = geo_to_tile(center, zoom);
    let p = geo_to_tile(point, zoom);
    let (hw, hh) = viewport.half();
    ScreenPoint::new(hw + (p.x - c.x) * TILE_SIZE, hh + (p.y - c.y) * TILE_SIZE)
}

/// Inverse of [`geo_to_screen`]: translate a pointer position back to geography.
pub fn screen_to_geo(screen: ScreenPoint, center: GeoPoint, zoom: f64, viewport: Viewport) -> GeoPoint {
    let c = geo_to_tile(center, zoom);
    let (hw, hh) = viewport.half();
    tile_to_geo(
        TilePoint {
            x: c.x + (screen.x - hw) / TILE_SIZE,
            y: c.y + (screen.y - hh) / TILE_SIZE,
        },
        zoom,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn origin_maps_to_world_center() {
        assert_close(lng_to_tile_x(0.0, 0.0), 0.5, 1e-12);
        assert_close(lat_to_tile_y(0.0, 0.0), 0.5, 1e-12);
        assert_close(lng_to_tile_x(-180.0, 3.0), 0.0, 1e-12);
        assert_close(lng_to_tile_x(180.0, 3.0), 8.0, 1e-12);
    }

    #[test]
    fn mercator_edge_maps_to_tile_border() {
        assert_close(lat_to_tile_y(MAX_MERCATOR_LAT, 0.0), 0.0, 1e-9);
        assert_close(lat_to_tile_y(-MAX_MERCATOR_LAT, 0.0), 1.0, 1e-9);
    }

    #[test]
    fn known_tile_for_madrid() {
        // Madrid sits in tile z=6 x=31 y=24.
        let t = geo_to_tile(GeoPoint::new(40.4168, -3.7038), 6.0);
        assert_eq!(t.x.floor() as i64, 31);
        assert_eq!(t.y.floor() as i64, 24);
    }

    #[test]
    fn tile_round_trip() {
        let zooms = [0.0, 4.0, 6.5, 12.0, 18.0];
        let mut lat = -84.0;
        while lat < 85.0 {
            let mut lng = -180.0;
            while lng <= 180.0 {
                for z in zooms {
                    assert_close(tile_x_to_lng(lng_to_tile_x(lng, z), z), lng, 1e-6);
                    assert_close(tile_y_to_lat(lat_to_tile_y(lat, z), z), lat, 1e-6);
                }
                lng += 22.5;
            }
            lat += 7.0;
        }
    }

    #[test]
    fn screen_round_trip() {
        let viewport = Viewport::new(1024.0, 768.0);
        let centers = [GeoPoint::new(41.5, -3.5), GeoPoint::new(36.0, -5.6), GeoPoint::new(-20.0, 140.0)];
        let samples = [
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(512.0, 384.0),
            ScreenPoint::new(1023.0, 12.5),
            ScreenPoint::new(-40.0, 900.0),
        ];
        for center in centers {
            for zoom in [4.0, 6.0, 9.0, 12.0] {
                for s in samples {
                    let geo = screen_to_geo(s, center, zoom, viewport);
                    let back = geo_to_screen(geo, center, zoom, viewport);
                    assert_close(back.x, s.x, 1e-6);
                    assert_close(back.y, s.y, 1e-6);

                    let again = screen_to_geo(back, center, zoom, viewport);
                    assert_close(again.lat, geo.lat, 1e-6);
                    assert_close(again.lng, geo.lng, 1e-6);
                }
            }
        }
    }

    #[test]
    fn center_projects_to_viewport_middle() {
        let viewport = Viewport::new(800.0, 600.0);
        let center = GeoPoint::new(41.5, -3.5);
        let s = geo_to_screen(center, center, 6.0, viewport);
        assert_close(s.x, 400.0, 1e-9);
        assert_close(s.y, 300.0, 1e-9);
    }

    #[test]
    fn margin_containment() {
        let viewport = Viewport::new(100.0, 100.0);
        assert!(viewport.contains_with_margin(ScreenPoint::new(-49.0, 50.0), 50.0));
        assert!(!viewport.contains_with_margin(ScreenPoint::new(151.0, 50.0), 50.0));
    }
}
