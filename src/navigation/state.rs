//! Trip state produced by the navigation controller.

use serde::{Deserialize, Serialize};

use crate::core::UserLocation;
use crate::route::{RouteStep, SpokenInstruction, VisualInstruction, Waypoint};

/// Result of a deviation check.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DeviationResult {
    /// The user is following the route.
    NoDeviation,
    /// The user has left the route.
    OffRoute {
        /// Perpendicular distance to the nearest point on the remaining
        /// route, in meters.
        deviation_m: f64,
    },
}

impl DeviationResult {
    /// True when the user is off-route.
    #[inline]
    pub fn is_off_route(&self) -> bool {
        matches!(self, Self::OffRoute { .. })
    }
}

/// The full state of a navigation session at one tick.
///
/// `TripState` is a plain value: the controller returns a new one on every
/// update and never mutates a previous one. A host that wants pause/resume
/// can therefore hold onto any state and feed it back in later.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TripState {
    /// Actively navigating along the route.
    Navigating {
        /// The user's position snapped to the active step's polyline.
        /// Accuracy, course, and timestamp are carried over from the
        /// observed fix.
        snapped_location: UserLocation,
        /// Steps not yet completed; the first entry is the active step.
        /// Never empty while navigating.
        remaining_steps: Vec<RouteStep>,
        /// Waypoints not yet visited.
        remaining_waypoints: Vec<Waypoint>,
        /// Arc length from the snapped position to the end of the active
        /// step, in meters.
        distance_to_next_maneuver_m: f64,
        /// Deviation verdict for this tick.
        deviation: DeviationResult,
        /// Banner to display now, if the active step has one.
        visual_instruction: Option<VisualInstruction>,
        /// Utterance to speak now, if the active step has one.
        spoken_instruction: Option<SpokenInstruction>,
    },
    /// The trip is finished. Terminal: updates leave it unchanged.
    Complete,
}

impl TripState {
    /// Is this the terminal state?
    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self, TripState::Complete)
    }

    /// State name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            TripState::Navigating { .. } => "Navigating",
            TripState::Complete => "Complete",
        }
    }

    /// Deviation verdict, when navigating.
    pub fn deviation(&self) -> Option<&DeviationResult> {
        match self {
            TripState::Navigating { deviation, .. } => Some(deviation),
            TripState::Complete => None,
        }
    }

    /// Aggregate progress figures, when navigating.
    pub fn progress(&self) -> Option<TripProgress> {
        match self {
            TripState::Navigating {
                remaining_steps,
                distance_to_next_maneuver_m,
                ..
            } => {
                let later_steps_m: f64 = remaining_steps
                    .iter()
                    .skip(1)
                    .map(|s| s.distance_m)
                    .sum();
                Some(TripProgress {
                    distance_to_next_maneuver_m: *distance_to_next_maneuver_m,
                    distance_remaining_m: distance_to_next_maneuver_m + later_steps_m,
                    remaining_steps: remaining_steps.len(),
                })
            }
            TripState::Complete => None,
        }
    }
}

/// Aggregate progress of a trip, derived from a `Navigating` state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripProgress {
    /// Distance to the next maneuver, in meters.
    pub distance_to_next_maneuver_m: f64,
    /// Distance to the end of the trip, in meters.
    pub distance_remaining_m: f64,
    /// Number of steps left, counting the active one.
    pub remaining_steps: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GeographicCoordinate, UserLocation};

    fn navigating_fixture() -> TripState {
        let step = |lng0: f64, lng1: f64, distance_m: f64| {
            RouteStep::new(
                vec![
                    GeographicCoordinate::new(0.0, lng0),
                    GeographicCoordinate::new(0.0, lng1),
                ],
                distance_m,
                None,
                "Continue".to_string(),
            )
        };
        TripState::Navigating {
            snapped_location: UserLocation::new(GeographicCoordinate::new(0.0, 0.0), 5.0),
            remaining_steps: vec![step(0.0, 0.001, 111.0), step(0.001, 0.002, 111.0)],
            remaining_waypoints: Vec::new(),
            distance_to_next_maneuver_m: 80.0,
            deviation: DeviationResult::NoDeviation,
            visual_instruction: None,
            spoken_instruction: None,
        }
    }

    #[test]
    fn test_progress_sums_later_steps() {
        let progress = navigating_fixture().progress().unwrap();
        assert_eq!(progress.distance_to_next_maneuver_m, 80.0);
        assert_eq!(progress.distance_remaining_m, 191.0);
        assert_eq!(progress.remaining_steps, 2);
    }

    #[test]
    fn test_complete_has_no_progress() {
        assert!(TripState::Complete.progress().is_none());
        assert!(TripState::Complete.deviation().is_none());
        assert!(TripState::Complete.is_complete());
        assert_eq!(TripState::Complete.name(), "Complete");
    }

    #[test]
    fn test_deviation_predicates() {
        assert!(!DeviationResult::NoDeviation.is_off_route());
        assert!(DeviationResult::OffRoute { deviation_m: 7.5 }.is_off_route());
    }
}
