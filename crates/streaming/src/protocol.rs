//! Tile addressing and request keys shared by the view and the fetchers.
//!
//! Tiles use the ZXY scheme with 256 px squares. Providers disagree on the
//! order of `x` and `y` in their URLs, so each [`TileStyle`] carries its own
//! template.

use serde::{Deserialize, Serialize};

use chrono::NaiveDate;
use foundation::GeoPoint;
use foundation::math::{tile_x_to_lng, tile_y_to_lat};

/// Tile coordinate in ZXY scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Tiles per axis at zoom `z`.
    pub fn tiles_per_axis(z: u8) -> u64 {
        1u64 << z
    }

    /// Build from signed grid indices: `x` wraps around the antimeridian,
    /// rows outside the world return `None`.
    pub fn wrapped(z: u8, x: i64, y: i64) -> Option<Self> {
        let n = Self::tiles_per_axis(z) as i64;
        if y < 0 || y >= n {
            return None;
        }
        Some(Self::new(z, x.rem_euclid(n) as u32, y as u32))
    }

    /// Geographic bounds as (lon_min, lat_min, lon_max, lat_max).
    pub fn bounds_wgs84(&self) -> (f64, f64, f64, f64) {
        let z = self.z as f64;
        let lon_min = tile_x_to_lng(self.x as f64, z);
        let lon_max = tile_x_to_lng(self.x as f64 + 1.0, z);
        // Web Mercator Y flip
        let lat_max = tile_y_to_lat(self.y as f64, z);
        let lat_min = tile_y_to_lat(self.y as f64 + 1.0, z);
        (lon_min, lat_min, lon_max, lat_max)
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Basemap flavour.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileStyle {
    #[default]
    Dark,
    Satellite,
}

impl TileStyle {
    pub const ALL: [TileStyle; 2] = [TileStyle::Dark, TileStyle::Satellite];

    pub fn url_template(self) -> &'static str {
        match self {
            TileStyle::Dark => "https://a.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png",
            TileStyle::Satellite => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
        }
    }

    pub fn attribution(self) -> &'static str {
        match self {
            TileStyle::Dark => "© OpenStreetMap contributors © CARTO",
            TileStyle::Satellite => "Tiles © Esri",
        }
    }

    pub fn tile_url(self, coord: TileCoord) -> String {
        self.url_template()
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }

    pub fn toggled(self) -> Self {
        match self {
            TileStyle::Dark => TileStyle::Satellite,
            TileStyle::Satellite => TileStyle::Dark,
        }
    }
}

impl std::str::FromStr for TileStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(TileStyle::Dark),
            "satellite" => Ok(TileStyle::Satellite),
            other => Err(format!("unknown tile style {other:?} (expected dark or satellite)")),
        }
    }
}

/// Location + date an auxiliary lookup is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuxQuery {
    pub point: GeoPoint,
    pub date: NaiveDate,
    /// Local hour of interest for hourly sources.
    pub hour: u8,
}

impl AuxQuery {
    pub fn new(point: GeoPoint, date: NaiveDate, hour: u8) -> Self {
        Self { point, date, hour }
    }

    /// Stable key at ~100 m resolution so repeated clicks dedupe.
    pub fn key(&self) -> String {
        format!("{:.3},{:.3}@{}T{:02}", self.point.lat, self.point.lng, self.date, self.hour)
    }
}
