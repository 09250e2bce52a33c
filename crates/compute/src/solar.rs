//! Topocentric sun position via the NREL solar position algorithm.
//!
//! Azimuth is reported as a compass bearing so it can be compared directly
//! with great-circle bearings between two map points.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use solar_positioning::spa;
use solar_positioning::time::DeltaT;
use solar_positioning::types::RefractionCorrection;
use tracing::warn;

use foundation::GeoPoint;
use foundation::math::normalize_degrees;

/// Observer height above sea level, metres. Map clicks carry no elevation.
const OBSERVER_ELEVATION_M: f64 = 0.0;

/// TT - UT1 in seconds when no estimate exists for the year.
const FALLBACK_DELTA_T_S: f64 = 69.0;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunPosition {
    /// Compass bearing: 0 = north, 90 = east, clockwise, in `[0, 360)`.
    pub azimuth_deg: f64,
    /// Apparent elevation above the horizon (refraction corrected); negative below it.
    pub altitude_deg: f64,
}

impl SunPosition {
    /// Reported when the algorithm rejects its input.
    const UNKNOWN: SunPosition = SunPosition {
        azimuth_deg: 0.0,
        altitude_deg: -90.0,
    };

    pub fn is_above_horizon(&self) -> bool {
        self.altitude_deg > 0.0
    }
}

/// Sun azimuth/altitude as seen from `point` at `instant`.
///
/// Latitudes beyond the poles are clamped and longitudes wrapped into
/// `[-180, 180)` before solving, so every finite input yields a position.
pub fn sun_position<Tz: TimeZone>(point: GeoPoint, instant: &DateTime<Tz>) -> SunPosition {
    let utc = instant.with_timezone(&Utc);
    let lat = point.lat.clamp(-90.0, 90.0);
    let lng = (point.lng + 180.0).rem_euclid(360.0) - 180.0;
    let delta_t = DeltaT::estimate_from_date(utc.year(), utc.month()).unwrap_or(FALLBACK_DELTA_T_S);

    match spa::solar_position(utc, lat, lng, OBSERVER_ELEVATION_M, delta_t, Some(RefractionCorrection::standard())) {
        Ok(pos) => SunPosition {
            azimuth_deg: normalize_degrees(pos.azimuth()),
            altitude_deg: pos.elevation_angle(),
        },
        Err(err) => {
            warn!(lat, lng, ?err, "solar position rejected input");
            SunPosition::UNKNOWN
        }
    }
}
