//! Route deviation detection.

use log::debug;

use crate::core::{snap_to_linestring, UserLocation};
use crate::navigation::config::RouteDeviationTracking;
use crate::navigation::state::DeviationResult;
use crate::route::{Route, RouteStep};

/// Perpendicular distance from a location to the nearest point on any of
/// the remaining steps' polylines.
///
/// Returns `None` when no step has a usable polyline (never the case for
/// a validated route).
pub(crate) fn deviation_from_route(
    location: &UserLocation,
    remaining_steps: &[RouteStep],
) -> Option<f64> {
    remaining_steps
        .iter()
        .filter_map(|step| snap_to_linestring(&location.coordinates, &step.geometry))
        .map(|snap| snap.perpendicular_m)
        .min_by(|a, b| a.total_cmp(b))
}

/// Evaluate the configured deviation policy for one tick.
pub(crate) fn check_route_deviation(
    tracking: &RouteDeviationTracking,
    location: &UserLocation,
    route: &Route,
    remaining_steps: &[RouteStep],
) -> DeviationResult {
    match tracking {
        RouteDeviationTracking::None => DeviationResult::NoDeviation,

        RouteDeviationTracking::StaticThreshold {
            min_horizontal_accuracy_m,
            max_acceptable_deviation_m,
        } => {
            if location.horizontal_accuracy_m > *min_horizontal_accuracy_m {
                // Fix too coarse to trust an off-route verdict
                return DeviationResult::NoDeviation;
            }
            match deviation_from_route(location, remaining_steps) {
                Some(deviation_m) if deviation_m > *max_acceptable_deviation_m => {
                    debug!(
                        "Off route: {:.1}m from the remaining route (threshold {:.1}m)",
                        deviation_m, max_acceptable_deviation_m
                    );
                    DeviationResult::OffRoute { deviation_m }
                }
                _ => DeviationResult::NoDeviation,
            }
        }

        RouteDeviationTracking::Custom { detector } => {
            detector.check_route_deviation(location, route, remaining_steps)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GeographicCoordinate;
    use crate::navigation::config::RouteDeviationDetector;
    use crate::route::{Waypoint, WaypointKind};
    use std::sync::Arc;

    fn coord(lat: f64, lng: f64) -> GeographicCoordinate {
        GeographicCoordinate::new(lat, lng)
    }

    fn straight_route() -> Route {
        Route::from_steps(
            vec![Waypoint::new(coord(0.0, 0.001), WaypointKind::Break)],
            vec![RouteStep::new(
                vec![coord(0.0, 0.0), coord(0.0, 0.001)],
                111.0,
                None,
                "Head east".to_string(),
            )],
        )
        .unwrap()
    }

    #[test]
    fn test_none_tracking_never_deviates() {
        let route = straight_route();
        // 1km north of the route
        let location = UserLocation::new(coord(0.01, 0.0005), 5.0);
        let result = check_route_deviation(
            &RouteDeviationTracking::None,
            &location,
            &route,
            &route.steps,
        );
        assert_eq!(result, DeviationResult::NoDeviation);
    }

    #[test]
    fn test_static_threshold_on_route() {
        let route = straight_route();
        let tracking = RouteDeviationTracking::StaticThreshold {
            min_horizontal_accuracy_m: 10.0,
            max_acceptable_deviation_m: 15.0,
        };
        // ~5.5m north of the line
        let location = UserLocation::new(coord(0.00005, 0.0005), 5.0);
        let result = check_route_deviation(&tracking, &location, &route, &route.steps);
        assert_eq!(result, DeviationResult::NoDeviation);
    }

    #[test]
    fn test_static_threshold_off_route() {
        let route = straight_route();
        let tracking = RouteDeviationTracking::StaticThreshold {
            min_horizontal_accuracy_m: 10.0,
            max_acceptable_deviation_m: 3.0,
        };
        let location = UserLocation::new(coord(0.00005, 0.0005), 5.0);
        match check_route_deviation(&tracking, &location, &route, &route.steps) {
            DeviationResult::OffRoute { deviation_m } => {
                assert!((deviation_m - 5.5).abs() < 0.5, "got {:.2}m", deviation_m);
            }
            DeviationResult::NoDeviation => panic!("expected off-route"),
        }
    }

    #[test]
    fn test_static_threshold_ignores_coarse_fixes() {
        let route = straight_route();
        let tracking = RouteDeviationTracking::StaticThreshold {
            min_horizontal_accuracy_m: 10.0,
            max_acceptable_deviation_m: 3.0,
        };
        // Far off the route but the fix is worse than the gate
        let location = UserLocation::new(coord(0.001, 0.0005), 50.0);
        let result = check_route_deviation(&tracking, &location, &route, &route.steps);
        assert_eq!(result, DeviationResult::NoDeviation);
    }

    #[test]
    fn test_custom_detector_verdict_passes_through() {
        struct AlwaysOff;
        impl RouteDeviationDetector for AlwaysOff {
            fn check_route_deviation(
                &self,
                _location: &UserLocation,
                _route: &Route,
                _remaining_steps: &[RouteStep],
            ) -> DeviationResult {
                DeviationResult::OffRoute { deviation_m: 42.0 }
            }
        }

        let route = straight_route();
        let tracking = RouteDeviationTracking::Custom {
            detector: Arc::new(AlwaysOff),
        };
        // On the route exactly; the custom detector still wins
        let location = UserLocation::new(coord(0.0, 0.0005), 5.0);
        let result = check_route_deviation(&tracking, &location, &route, &route.steps);
        assert_eq!(result, DeviationResult::OffRoute { deviation_m: 42.0 });
    }
}
