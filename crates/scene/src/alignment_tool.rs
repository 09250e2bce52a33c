use serde::{Deserialize, Serialize};
use thiserror::Error;

use compute::AlignmentState;
use foundation::GeoPoint;

/// What the next map click means while the alignment tool is open.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    #[default]
    Idle,
    /// Next click sets the observer.
    AwaitingPointA,
    /// Next click sets the target; only reachable once the observer exists.
    AwaitingPointB,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ModeError {
    /// Target requested before an observer was placed.
    #[error("place the observer (point A) before the target")]
    ObserverMissing,
}

impl AlignmentMode {
    pub fn is_awaiting(self) -> bool {
        self != AlignmentMode::Idle
    }

    pub fn request_point_a(&mut self) {
        *self = AlignmentMode::AwaitingPointA;
    }

    pub fn request_point_b(&mut self, state: &AlignmentState) -> Result<(), ModeError> {
        if state.point_a.is_none() {
            return Err(ModeError::ObserverMissing);
        }
        *self = AlignmentMode::AwaitingPointB;
        Ok(())
    }

    pub fn cancel(&mut self) {
        *self = AlignmentMode::Idle;
    }

    /// Record `point` for the awaited slot and return to idle.
    ///
    /// Returns `false` (and leaves everything alone) when nothing was awaited.
    pub fn capture(&mut self, point: GeoPoint, state: &mut AlignmentState) -> bool {
        match *self {
            AlignmentMode::Idle => return false,
            AlignmentMode::AwaitingPointA => state.point_a = Some(point),
            AlignmentMode::AwaitingPointB => state.point_b = Some(point),
        }
        *self = AlignmentMode::Idle;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{AlignmentMode, ModeError};
    use chrono::DateTime;
    use compute::AlignmentState;
    use foundation::GeoPoint;

    fn state() -> AlignmentState {
        AlignmentState::new(DateTime::parse_from_rfc3339("2026-08-12T20:30:00+02:00").unwrap())
    }

    #[test]
    fn target_requires_observer() {
        let mut mode = AlignmentMode::default();
        let mut s = state();
        let err = mode.request_point_b(&s).unwrap_err();
        assert_eq!(err, ModeError::ObserverMissing);
        assert_eq!(err.to_string(), "place the observer (point A) before the target");
        assert_eq!(mode, AlignmentMode::Idle);

        mode.request_point_a();
        assert!(mode.capture(GeoPoint::new(43.0, -8.0), &mut s));
        assert_eq!(mode, AlignmentMode::Idle);
        assert!(s.is_ready());

        assert_eq!(mode.request_point_b(&s), Ok(()));
        assert!(mode.capture(GeoPoint::new(43.1, -8.0), &mut s));
        assert_eq!(s.point_b, Some(GeoPoint::new(43.1, -8.0)));
        assert_eq!(mode, AlignmentMode::Idle);
    }

    #[test]
    fn idle_capture_is_a_no_op() {
        let mut mode = AlignmentMode::Idle;
        let mut s = state();
        assert!(!mode.capture(GeoPoint::new(1.0, 1.0), &mut s));
        assert_eq!(s, state());
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut mode = AlignmentMode::Idle;
        mode.request_point_a();
        assert!(mode.is_awaiting());
        mode.cancel();
        assert!(!mode.is_awaiting());
    }
}
