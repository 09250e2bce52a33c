//! Distance-driven estimate of local eclipse circumstances.
//!
//! Everything is derived from the distance to the nearest central-line
//! vertex plus the nearest published city record. Results are approximate;
//! far outside the visibility region they are well formed but meaningless.

use serde::{Deserialize, Serialize};

use catalog::EclipseEvent;
use foundation::math::round_to;
use foundation::time::{NOT_APPLICABLE, format_duration_secs, optional_clock};
use foundation::{ClockTime, GeoPoint};

use crate::analysis::proximity::{closest_point_on_polyline, nearest_city};
use crate::solar::sun_position;

/// Magnitude gained at the centre line over the edge of the band.
const CENTRAL_MAGNITUDE_EXCESS: f64 = 0.03;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EclipseCalculationResult {
    pub is_in_totality: bool,
    /// Rounded to whole kilometres; `+inf` when the event has no central line.
    pub distance_from_center_km: f64,
    /// `"{m}m {s}s"` inside totality, `"-"` otherwise.
    pub estimated_duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration_secs: Option<f64>,
    #[serde(with = "optional_clock")]
    pub estimated_max_time_local: Option<ClockTime>,
    pub timezone_label: String,
    pub magnitude: f64,
    pub coverage_percent: u8,
    pub sun_altitude_deg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearest_city: Option<String>,
}

impl EclipseCalculationResult {
    /// Time of maximum with its zone label, e.g. `"20:28 CEST"`.
    pub fn max_time_label(&self) -> String {
        match self.estimated_max_time_local {
            Some(t) => format!("{t} {}", self.timezone_label),
            None => NOT_APPLICABLE.to_string(),
        }
    }
}

/// Estimate the eclipse as seen from `query`. Total for every finite input.
pub fn calculate_eclipse_data(query: GeoPoint, event: &EclipseEvent) -> EclipseCalculationResult {
    let band = &event.band;
    let center = closest_point_on_polyline(query, event.proximity_line());
    let distance = center.distance_km;
    let is_in_totality = band.policy.contains(query, distance);
    let nearest = nearest_city(query, &event.cities);

    let normalized = if distance.is_finite() {
        (distance / band.duration_band_width_km).min(1.0)
    } else {
        1.0
    };

    let (duration_secs, magnitude) = if is_in_totality {
        let ceiling = nearest
            .and_then(|n| n.city.totality_duration)
            .unwrap_or(band.central_duration) as f64;
        let falloff = (1.0 - normalized * normalized).max(0.0).sqrt();
        (Some(ceiling * falloff), 1.0 + CENTRAL_MAGNITUDE_EXCESS * (1.0 - normalized))
    } else {
        let decayed = 1.0 - distance * band.partial_decay_per_km;
        (None, decayed.max(band.partial_magnitude_floor))
    };
    let magnitude = round_to(magnitude, 3);

    let coverage_percent = if is_in_totality {
        100
    } else {
        (magnitude * 100.0).round().clamp(0.0, 100.0) as u8
    };

    let sun_altitude_deg = match nearest {
        Some(n) => n.city.sun_altitude_deg,
        None => {
            let reference = event.info.alignment_reference;
            round_to(sun_position(query, &reference).altitude_deg, 0)
        }
    };

    EclipseCalculationResult {
        is_in_totality,
        distance_from_center_km: round_to(distance, 0),
        estimated_duration: duration_secs
            .map(format_duration_secs)
            .unwrap_or_else(|| NOT_APPLICABLE.to_string()),
        estimated_duration_secs: duration_secs,
        estimated_max_time_local: nearest.map(|n| n.city.times.maximum),
        timezone_label: event.info.timezone.label.clone(),
        magnitude,
        coverage_percent,
        sun_altitude_deg,
        nearest_city: nearest.map(|n| n.city.name.clone()),
    }
}
