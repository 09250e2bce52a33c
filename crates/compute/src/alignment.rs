//! Sun / landmark alignment.
//!
//! From observer A, does the sun sit behind target B at some minute around
//! the eclipse maximum? Compares the sun's azimuth with the bearing A→B.

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use foundation::GeoPoint;
use foundation::math::{angular_difference_deg, initial_bearing_deg};

use crate::solar::sun_position;

/// Below this azimuth difference the sun counts as aligned with the target.
pub const ALIGNMENT_THRESHOLD_DEG: f64 = 2.0;

/// The offset slider spans `[-MAX_TIME_OFFSET_MINUTES, MAX_TIME_OFFSET_MINUTES]`.
pub const MAX_TIME_OFFSET_MINUTES: i32 = 60;

pub fn clamp_offset_minutes(minutes: i32) -> i32 {
    minutes.clamp(-MAX_TIME_OFFSET_MINUTES, MAX_TIME_OFFSET_MINUTES)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentState {
    pub point_a: Option<GeoPoint>,
    pub point_b: Option<GeoPoint>,
    pub reference_time: DateTime<FixedOffset>,
    time_offset_minutes: i32,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub instant: DateTime<FixedOffset>,
    pub sun_azimuth_deg: f64,
    pub sun_altitude_deg: f64,
    pub bearing_a_to_b_deg: Option<f64>,
    pub angular_difference_deg: Option<f64>,
}

impl AlignmentResult {
    pub fn is_aligned(&self) -> bool {
        self.angular_difference_deg
            .is_some_and(|d| d < ALIGNMENT_THRESHOLD_DEG)
    }
}

impl AlignmentState {
    pub fn new(reference_time: DateTime<FixedOffset>) -> Self {
        Self {
            point_a: None,
            point_b: None,
            reference_time,
            time_offset_minutes: 0,
        }
    }

    pub fn time_offset_minutes(&self) -> i32 {
        self.time_offset_minutes
    }

    /// Out-of-range offsets are clamped.
    pub fn set_time_offset_minutes(&mut self, minutes: i32) {
        self.time_offset_minutes = clamp_offset_minutes(minutes);
    }

    /// Results are only computed once an observer exists.
    pub fn is_ready(&self) -> bool {
        self.point_a.is_some()
    }

    pub fn clear(&mut self) {
        self.point_a = None;
        self.point_b = None;
    }

    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant_at(self.time_offset_minutes)
    }

    fn instant_at(&self, offset_minutes: i32) -> DateTime<FixedOffset> {
        self.reference_time + Duration::minutes(offset_minutes as i64)
    }

    pub fn result(&self) -> Option<AlignmentResult> {
        let a = self.point_a?;
        Some(compute_alignment(a, self.point_b, self.instant()))
    }

    /// Offset in the slider range with the smallest azimuth difference,
    /// returned with that difference. Needs both points.
    pub fn best_offset(&self) -> Option<(i32, f64)> {
        let a = self.point_a?;
        let b = self.point_b?;
        let bearing = initial_bearing_deg(a, b);
        let mut best: Option<(i32, f64)> = None;
        for minutes in -MAX_TIME_OFFSET_MINUTES..=MAX_TIME_OFFSET_MINUTES {
            let sun = sun_position(a, &self.instant_at(minutes));
            let diff = angular_difference_deg(sun.azimuth_deg, bearing);
            if best.map(|(_, bd)| diff < bd).unwrap_or(true) {
                best = Some((minutes, diff));
            }
        }
        best
    }
}

/// Sun position from `a` at `instant`, plus the comparison with `b` when given.
pub fn compute_alignment(a: GeoPoint, b: Option<GeoPoint>, instant: DateTime<FixedOffset>) -> AlignmentResult {
    let sun = sun_position(a, &instant);
    let bearing = b.map(|b| initial_bearing_deg(a, b));
    AlignmentResult {
        instant,
        sun_azimuth_deg: sun.azimuth_deg,
        sun_altitude_deg: sun.altitude_deg,
        bearing_a_to_b_deg: bearing,
        angular_difference_deg: bearing.map(|b| angular_difference_deg(sun.azimuth_deg, b)),
    }
}
