//! Runtime settings for the `eclipse` binary.
//!
//! Values come from the environment first; command-line flags override them.

use std::path::PathBuf;

use thiserror::Error;

use streaming::{FetchConfig, TileStyle};

pub const ENV_CATALOG: &str = "ECLIPSE_CATALOG";
pub const ENV_TILE_STYLE: &str = "ECLIPSE_TILE_STYLE";
pub const ENV_FETCH_TIMEOUT_MS: &str = "ECLIPSE_FETCH_TIMEOUT_MS";
pub const ENV_RAPIDAPI_KEY: &str = "RAPIDAPI_KEY";
pub const ENV_MOON_API_URL: &str = "MOON_API_URL";
pub const ENV_WEATHER_API_URL: &str = "WEATHER_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Flag values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub catalog: Option<PathBuf>,
    pub tile_style: Option<TileStyle>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Replacement catalog file; the built-in events are used when unset.
    pub catalog: Option<PathBuf>,
    pub fetch: FetchConfig,
}

impl Settings {
    pub fn from_env(overrides: Overrides) -> Result<Self, SettingsError> {
        Self::resolve(|var| std::env::var(var).ok(), overrides)
    }

    /// Resolve with a custom variable lookup. Blank values count as unset.
    pub fn resolve<F>(lookup: F, overrides: Overrides) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut fetch = FetchConfig::default();

        if let Some(raw) = get(ENV_TILE_STYLE) {
            fetch.tile_style = raw.parse().map_err(|reason| SettingsError::Invalid {
                var: ENV_TILE_STYLE,
                reason,
            })?;
        }
        if let Some(raw) = get(ENV_FETCH_TIMEOUT_MS) {
            fetch.timeout_ms = raw.parse().map_err(|_| SettingsError::Invalid {
                var: ENV_FETCH_TIMEOUT_MS,
                reason: format!("expected milliseconds, got {raw:?}"),
            })?;
        }
        fetch.rapidapi_key = get(ENV_RAPIDAPI_KEY);
        if let Some(url) = get(ENV_MOON_API_URL) {
            fetch.moon_api_url = url;
        }
        if let Some(url) = get(ENV_WEATHER_API_URL) {
            fetch.weather_archive_url = url;
        }

        if let Some(style) = overrides.tile_style {
            fetch.tile_style = style;
        }
        if let Some(ms) = overrides.timeout_ms {
            fetch.timeout_ms = ms;
        }
        let catalog = overrides.catalog.or_else(|| get(ENV_CATALOG).map(PathBuf::from));

        Ok(Self { catalog, fetch })
    }
}
