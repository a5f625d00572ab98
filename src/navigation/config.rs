//! Navigation controller configuration.
//!
//! Step advance and deviation tracking are closed policy sets modeled as
//! tagged unions; hosts that need bespoke deviation logic inject it
//! through the [`RouteDeviationDetector`] capability trait.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::UserLocation;
use crate::navigation::state::DeviationResult;
use crate::route::{Route, RouteStep};

/// Host-injected deviation predicate.
///
/// Implementations must be pure with respect to the controller: the same
/// `(route, remaining_steps, location)` must yield the same result.
pub trait RouteDeviationDetector: Send + Sync {
    /// Decide whether the user has deviated from the route.
    fn check_route_deviation(
        &self,
        location: &UserLocation,
        route: &Route,
        remaining_steps: &[RouteStep],
    ) -> DeviationResult;
}

/// When the controller moves from the active step to the next one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum StepAdvanceMode {
    /// Never advance automatically; only
    /// [`advance_to_next_step`](crate::navigation::NavigationController::advance_to_next_step)
    /// moves to the next step.
    Manual,

    /// Advance when the snapped position is within `distance_m` of the end
    /// of the current step and the fix is at least as accurate as
    /// `min_horizontal_accuracy_m`.
    DistanceToEndOfStep {
        /// Remaining distance on the current step that triggers advance.
        distance_m: f64,
        /// Worst acceptable horizontal accuracy for the triggering fix.
        min_horizontal_accuracy_m: f64,
    },

    /// Advance when the fix is accurate enough and either the current step
    /// is nearly finished or the user is already closer to the next step's
    /// polyline than to the current one.
    RelativeLineStringDistance {
        /// Worst acceptable horizontal accuracy for the triggering fix.
        min_horizontal_accuracy_m: f64,
        /// Remaining distance on the current step that always advances.
        automatic_advance_distance_m: f64,
    },
}

/// How route deviation is detected.
#[derive(Clone)]
pub enum RouteDeviationTracking {
    /// Never report a deviation.
    None,

    /// Off-route when the perpendicular distance to the remaining route
    /// exceeds a fixed threshold and the fix is accurate enough to trust.
    StaticThreshold {
        /// Worst acceptable horizontal accuracy for a fix to be considered.
        min_horizontal_accuracy_m: f64,
        /// Perpendicular distance beyond which the user is off-route.
        max_acceptable_deviation_m: f64,
    },

    /// Host-provided detector.
    Custom {
        /// The injected predicate.
        detector: Arc<dyn RouteDeviationDetector>,
    },
}

// Custom carries a trait object, so Debug is by hand and the enum does not
// derive serde.
impl fmt::Debug for RouteDeviationTracking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::StaticThreshold {
                min_horizontal_accuracy_m,
                max_acceptable_deviation_m,
            } => f
                .debug_struct("StaticThreshold")
                .field("min_horizontal_accuracy_m", min_horizontal_accuracy_m)
                .field("max_acceptable_deviation_m", max_acceptable_deviation_m)
                .finish(),
            Self::Custom { .. } => write!(f, "Custom"),
        }
    }
}

/// Configuration for a [`NavigationController`](crate::navigation::NavigationController).
#[derive(Clone, Debug)]
pub struct NavigationControllerConfig {
    /// Step-advance policy.
    pub step_advance: StepAdvanceMode,
    /// Route-deviation policy.
    pub route_deviation_tracking: RouteDeviationTracking,
}

impl Default for NavigationControllerConfig {
    fn default() -> Self {
        Self {
            step_advance: StepAdvanceMode::RelativeLineStringDistance {
                min_horizontal_accuracy_m: 25.0,
                automatic_advance_distance_m: 16.0,
            },
            route_deviation_tracking: RouteDeviationTracking::StaticThreshold {
                min_horizontal_accuracy_m: 25.0,
                max_acceptable_deviation_m: 20.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NavigationControllerConfig::default();
        assert!(matches!(
            config.step_advance,
            StepAdvanceMode::RelativeLineStringDistance { .. }
        ));
        assert!(matches!(
            config.route_deviation_tracking,
            RouteDeviationTracking::StaticThreshold { .. }
        ));
    }

    #[test]
    fn test_step_advance_mode_round_trips_through_serde() {
        let mode = StepAdvanceMode::DistanceToEndOfStep {
            distance_m: 30.0,
            min_horizontal_accuracy_m: 16.0,
        };
        let json = serde_json::to_string(&mode).unwrap();
        let back: StepAdvanceMode = serde_json::from_str(&json).unwrap();
        assert_eq!(mode, back);
    }

    #[test]
    fn test_deviation_tracking_debug() {
        let tracking = RouteDeviationTracking::StaticThreshold {
            min_horizontal_accuracy_m: 25.0,
            max_acceptable_deviation_m: 20.0,
        };
        assert!(format!("{:?}", tracking).contains("StaticThreshold"));
    }
}
