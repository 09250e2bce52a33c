use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::protocol::TileStyle;

pub const DEFAULT_MOON_API_URL: &str = "https://moon-phase.p.rapidapi.com/advanced";
pub const DEFAULT_MOON_API_HOST: &str = "moon-phase.p.rapidapi.com";
pub const DEFAULT_WEATHER_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Settings for everything fetched over the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_ms: u64,
    pub moon_api_url: String,
    pub moon_api_host: String,
    /// Without a key the moon lookup reports "unavailable" without a request.
    #[serde(skip_serializing)]
    pub rapidapi_key: Option<String>,
    pub weather_archive_url: String,
    /// How many past years the weather summary looks at.
    pub weather_years: u32,
    pub tile_style: TileStyle,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 8_000,
            moon_api_url: DEFAULT_MOON_API_URL.to_string(),
            moon_api_host: DEFAULT_MOON_API_HOST.to_string(),
            rapidapi_key: None,
            weather_archive_url: DEFAULT_WEATHER_ARCHIVE_URL.to_string(),
            weather_years: 5,
            tile_style: TileStyle::Dark,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::FetchConfig;
    use crate::protocol::TileStyle;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: FetchConfig = serde_json::from_str(r#"{"timeout_ms": 2500, "tile_style": "satellite"}"#).unwrap();
        assert_eq!(cfg.timeout_ms, 2500);
        assert_eq!(cfg.tile_style, TileStyle::Satellite);
        assert_eq!(cfg.weather_years, 5);
        assert!(cfg.rapidapi_key.is_none());
    }

    #[test]
    fn key_is_never_serialized() {
        let cfg = FetchConfig {
            rapidapi_key: Some("secret".into()),
            ..FetchConfig::default()
        };
        let raw = serde_json::to_string(&cfg).unwrap();
        assert!(!raw.contains("secret"));
    }
}
