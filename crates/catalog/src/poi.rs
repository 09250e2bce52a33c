use serde::{Deserialize, Serialize};

use foundation::GeoPoint;
use foundation::time::optional_duration_string;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiCategory {
    Monument,
    Natural,
    Religious,
    Museum,
    Viewpoint,
}

impl PoiCategory {
    pub const ALL: [PoiCategory; 5] = [
        PoiCategory::Monument,
        PoiCategory::Natural,
        PoiCategory::Religious,
        PoiCategory::Museum,
        PoiCategory::Viewpoint,
    ];

    /// Dense index in `[0, ALL.len())`, stable across releases.
    pub fn index(self) -> usize {
        match self {
            PoiCategory::Monument => 0,
            PoiCategory::Natural => 1,
            PoiCategory::Religious => 2,
            PoiCategory::Museum => 3,
            PoiCategory::Viewpoint => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PoiCategory::Monument => "Monument",
            PoiCategory::Natural => "Natural",
            PoiCategory::Religious => "Religious",
            PoiCategory::Museum => "Museum",
            PoiCategory::Viewpoint => "Viewpoint",
        }
    }

    /// Marker colour as a CSS hex string.
    pub fn color(self) -> &'static str {
        match self {
            PoiCategory::Monument => "#f59e0b",
            PoiCategory::Natural => "#10b981",
            PoiCategory::Religious => "#ec4899",
            PoiCategory::Museum => "#8b5cf6",
            PoiCategory::Viewpoint => "#06b6d4",
        }
    }
}

impl std::str::FromStr for PoiCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PoiCategory::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown category {wanted:?}"))
    }
}

/// A photogenic place worth travelling to for the eclipse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub point: GeoPoint,
    pub category: PoiCategory,
    pub description: String,
    pub photo_tip: String,
    pub in_totality: bool,
    #[serde(default, with = "optional_duration_string")]
    pub totality_duration: Option<u32>,
}
