//! Wall-clock and duration strings as they appear in eclipse tables.
//!
//! Tables carry local clock times as `"HH:MM"` and totality durations as
//! `"1m 16s"` (the space is optional). A lone `"-"` marks "not applicable",
//! e.g. no totality at a location with only a partial eclipse.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Placeholder used by tables for a missing value.
pub const NOT_APPLICABLE: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("invalid clock time {0:?}, expected HH:MM")]
    Clock(String),
    #[error("invalid duration {0:?}, expected e.g. \"1m 16s\"")]
    Duration(String),
}

/// Local wall-clock time with minute resolution.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn parse(raw: &str) -> Result<Self, TimeParseError> {
        let err = || TimeParseError::Clock(raw.to_string());
        let (h, m) = raw.trim().split_once(':').ok_or_else(err)?;
        let hour: u8 = h.parse().map_err(|_| err())?;
        let minute: u8 = m.parse().map_err(|_| err())?;
        Self::new(hour, minute).ok_or_else(err)
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn minutes_since_midnight(self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl std::str::FromStr for ClockTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ClockTime::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<ClockTime>` written as `"HH:MM"` or `"-"`.
pub mod optional_clock {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{ClockTime, NOT_APPLICABLE};

    pub fn serialize<S: Serializer>(value: &Option<ClockTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.collect_str(t),
            None => serializer.serialize_str(NOT_APPLICABLE),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ClockTime>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim() == NOT_APPLICABLE {
            return Ok(None);
        }
        ClockTime::parse(&raw).map(Some).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for a totality duration in seconds written as `"1m 16s"`.
pub mod duration_string {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{format_duration_secs, parse_duration_secs};

    pub fn serialize<S: Serializer>(secs: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_duration_secs(*secs as f64))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_duration_secs(&raw)
            .map_err(serde::de::Error::custom)?
            .ok_or_else(|| serde::de::Error::custom("duration is required here, got \"-\""))
    }
}

/// Like [`duration_string`] but `"-"` maps to `None`.
pub mod optional_duration_string {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{NOT_APPLICABLE, format_duration_secs, parse_duration_secs};

    pub fn serialize<S: Serializer>(secs: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        match secs {
            Some(s) => serializer.serialize_str(&format_duration_secs(*s as f64)),
            None => serializer.serialize_str(NOT_APPLICABLE),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_duration_secs(&raw).map_err(serde::de::Error::custom)
    }
}

/// Parse `"XmYs"` / `"Xm Ys"` into seconds. `"-"` yields `Ok(None)`.
pub fn parse_duration_secs(raw: &str) -> Result<Option<u32>, TimeParseError> {
    let trimmed = raw.trim();
    if trimmed == NOT_APPLICABLE {
        return Ok(None);
    }
    let err = || TimeParseError::Duration(raw.to_string());

    let (minutes, rest) = trimmed.split_once('m').ok_or_else(err)?;
    let seconds = rest.trim().strip_suffix('s').ok_or_else(err)?;
    let minutes: u32 = minutes.trim().parse().map_err(|_| err())?;
    let seconds: u32 = seconds.trim().parse().map_err(|_| err())?;
    if seconds >= 60 {
        return Err(err());
    }
    let total = minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .ok_or_else(err)?;
    Ok(Some(total))
}

/// Format seconds as `"{m}m {s}s"`.
///
/// Seconds are rounded before splitting so the output never reads `"0m 60s"`.
pub fn format_duration_secs(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    format!("{}m {}s", total / 60, total % 60)
}
