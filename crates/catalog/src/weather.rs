use serde::{Deserialize, Serialize};

use foundation::GeoPoint;

/// Climatological cloud risk for a region along the track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherZone {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub point: GeoPoint,
    /// Chance of cloud at eclipse time, 0-100 (lower is better).
    pub cloud_probability: u8,
    pub description: String,
}

impl WeatherZone {
    pub fn outlook(&self) -> SkyOutlook {
        SkyOutlook::from_cloud_probability(self.cloud_probability)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkyOutlook {
    Excellent,
    Good,
    Fair,
    Variable,
    Poor,
}

impl SkyOutlook {
    pub fn from_cloud_probability(percent: u8) -> Self {
        match percent {
            0..=20 => SkyOutlook::Excellent,
            21..=30 => SkyOutlook::Good,
            31..=40 => SkyOutlook::Fair,
            41..=55 => SkyOutlook::Variable,
            _ => SkyOutlook::Poor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SkyOutlook::Excellent => "Excellent",
            SkyOutlook::Good => "Good",
            SkyOutlook::Fair => "Fair",
            SkyOutlook::Variable => "Variable",
            SkyOutlook::Poor => "Poor",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            SkyOutlook::Excellent => "#22c55e",
            SkyOutlook::Good => "#84cc16",
            SkyOutlook::Fair => "#eab308",
            SkyOutlook::Variable => "#f97316",
            SkyOutlook::Poor => "#ef4444",
        }
    }
}
