//! Lunar phase lookups (RapidAPI "moon-phase" advanced endpoint).

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Moon section of the provider response. Missing fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoonInfo {
    pub phase: f64,
    pub phase_name: String,
    pub stage: String,
    /// The provider sends a string such as `"2%"`.
    pub illumination: String,
    pub age_days: f64,
    pub emoji: String,
    pub moonrise: String,
    pub moonset: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunInfo {
    pub sunrise_timestamp: String,
    pub sunset_timestamp: String,
    pub solar_noon: String,
    pub day_length: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoonData {
    pub datestamp: String,
    pub moon: MoonInfo,
    pub sun: SunInfo,
}

impl MoonData {
    /// Illumination as a number in `[0, 100]`, when the provider string parses.
    pub fn illumination_percent(&self) -> Option<f64> {
        let raw = self.moon.illumination.trim().trim_end_matches('%').trim();
        raw.parse::<f64>().ok().filter(|v| (0.0..=100.0).contains(v))
    }
}

pub fn parse_moon_response(body: &str) -> Result<MoonData, FetchError> {
    let data: MoonData = serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    if data.moon.phase_name.is_empty() {
        return Err(FetchError::NoData);
    }
    Ok(data)
}
