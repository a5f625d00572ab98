//! Step-advance predicate.
//!
//! Decides when the active step is finished. Pure: the decision depends
//! only on the policy, the observed fix, and the step geometries.

use log::debug;

use crate::core::{remaining_on_segments, snap_to_linestring, UserLocation};
use crate::navigation::config::StepAdvanceMode;
use crate::route::RouteStep;

/// Should the controller drop the active step and move to the next one?
pub(crate) fn should_advance_step(
    mode: &StepAdvanceMode,
    location: &UserLocation,
    current: &RouteStep,
    next: Option<&RouteStep>,
) -> bool {
    match *mode {
        StepAdvanceMode::Manual => false,

        StepAdvanceMode::DistanceToEndOfStep {
            distance_m,
            min_horizontal_accuracy_m,
        } => {
            if location.horizontal_accuracy_m > min_horizontal_accuracy_m {
                return false;
            }
            match snap_to_linestring(&location.coordinates, &current.geometry) {
                Some(snap) => {
                    let remaining =
                        remaining_on_segments(&current.geometry, snap.segment_index, snap.t);
                    remaining <= distance_m
                }
                None => false,
            }
        }

        StepAdvanceMode::RelativeLineStringDistance {
            min_horizontal_accuracy_m,
            automatic_advance_distance_m,
        } => {
            if location.horizontal_accuracy_m > min_horizontal_accuracy_m {
                return false;
            }
            let Some(current_snap) = snap_to_linestring(&location.coordinates, &current.geometry)
            else {
                return false;
            };

            let remaining =
                remaining_on_segments(&current.geometry, current_snap.segment_index, current_snap.t);
            if remaining <= automatic_advance_distance_m {
                debug!(
                    "Step advance: {:.1}m remaining (threshold {:.1}m)",
                    remaining, automatic_advance_distance_m
                );
                return true;
            }

            match next.and_then(|n| snap_to_linestring(&location.coordinates, &n.geometry)) {
                Some(next_snap) => {
                    let closer = next_snap.perpendicular_m < current_snap.perpendicular_m;
                    if closer {
                        debug!(
                            "Step advance: next step is closer ({:.1}m vs {:.1}m)",
                            next_snap.perpendicular_m, current_snap.perpendicular_m
                        );
                    }
                    closer
                }
                None => false,
            }
        }
    }
}
