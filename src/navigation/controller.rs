//! The navigation state machine.
//!
//! [`NavigationController`] composes snapping, step advance, deviation
//! detection, and instruction selection into a pure transition function
//! over trip states. It holds no clocks, no randomness, and performs no
//! I/O; every time-sensitive policy (recalculation cooldown, TTS replay
//! suppression) belongs to the host.

use log::{debug, info, warn};

use crate::core::{remaining_on_segments, snap_to_linestring, UserLocation};
use crate::error::{MargaError, Result};
use crate::navigation::config::NavigationControllerConfig;
use crate::navigation::deviation::check_route_deviation;
use crate::navigation::instruction::{select_spoken_instruction, select_visual_instruction};
use crate::navigation::state::TripState;
use crate::navigation::step_advance::should_advance_step;
use crate::route::{Route, RouteStep, Waypoint, WaypointKind};

/// Tolerance for matching a step's end coordinate against a waypoint.
///
/// Routing engines place leg boundaries exactly on break waypoints, but
/// the two coordinates may round differently on the wire.
const WAYPOINT_EPSILON_DEG: f64 = 1e-5;

/// Turn-by-turn navigation controller for a single route.
///
/// Construct one per navigation session. All methods take and return trip
/// states by value; the controller itself never changes after
/// construction, so a host may call it from any thread as long as updates
/// for one session are serialized.
pub struct NavigationController {
    route: Route,
    config: NavigationControllerConfig,
}

impl NavigationController {
    /// Create a controller over a validated route.
    pub fn new(route: Route, config: NavigationControllerConfig) -> Self {
        Self { route, config }
    }

    /// The route this controller navigates.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// The active configuration.
    pub fn config(&self) -> &NavigationControllerConfig {
        &self.config
    }

    /// Build the initial trip state from the first location fix.
    ///
    /// Snaps the fix to the first step and reports over the full step and
    /// waypoint lists. Fails with [`MargaError::NoUserLocation`] when the
    /// fix is ill-formed (out-of-range coordinate or negative accuracy).
    pub fn initial_state(&self, location: UserLocation) -> Result<TripState> {
        if !location.is_well_formed() {
            return Err(MargaError::NoUserLocation {
                detail: format!(
                    "coordinate ({}, {}) with accuracy {}",
                    location.coordinates.lat,
                    location.coordinates.lng,
                    location.horizontal_accuracy_m
                ),
            });
        }

        Ok(self
            .navigate(
                location,
                self.route.steps.clone(),
                self.route.waypoints.clone(),
                false,
            )
            .unwrap_or(TripState::Complete))
    }

    /// Advance the trip state with a new location fix.
    ///
    /// Never fails: an ill-formed fix leaves the state unchanged (the last
    /// good snapped location is retained), and a `Complete` state is
    /// absorbing.
    pub fn update_user_location(&self, state: TripState, location: UserLocation) -> TripState {
        match state {
            TripState::Complete => TripState::Complete,
            TripState::Navigating {
                ref remaining_steps,
                ref remaining_waypoints,
                ..
            } => {
                if !location.is_well_formed() {
                    warn!(
                        "Ignoring ill-formed location fix (accuracy {})",
                        location.horizontal_accuracy_m
                    );
                    return state;
                }
                match self.navigate(
                    location,
                    remaining_steps.clone(),
                    remaining_waypoints.clone(),
                    true,
                ) {
                    Some(next) => next,
                    // Snapping failed; keep the last good snapped location
                    None => state,
                }
            }
        }
    }

    /// Force one step advance, regardless of the step-advance policy.
    ///
    /// Recomputes the snap and instructions against the new active step
    /// using the last snapped location. Transitions to `Complete` when the
    /// dropped step was the last one.
    pub fn advance_to_next_step(&self, state: TripState) -> TripState {
        match state {
            TripState::Complete => TripState::Complete,
            TripState::Navigating {
                snapped_location,
                mut remaining_steps,
                mut remaining_waypoints,
                ..
            } => {
                if remaining_steps.is_empty() {
                    return TripState::Complete;
                }
                let finished = remaining_steps.remove(0);
                retire_break_waypoint(&finished, &mut remaining_waypoints);

                if remaining_steps.is_empty() {
                    info!("Trip complete: final step finished");
                    return TripState::Complete;
                }

                self.navigate(snapped_location, remaining_steps, remaining_waypoints, false)
                    .unwrap_or(TripState::Complete)
            }
        }
    }

    /// Core transition: snap, advance while the policy fires, then derive
    /// deviation and instructions.
    ///
    /// Returns `None` only when no step polyline can be snapped to, which
    /// a validated route rules out.
    fn navigate(
        &self,
        location: UserLocation,
        mut remaining_steps: Vec<RouteStep>,
        mut remaining_waypoints: Vec<Waypoint>,
        allow_policy_advance: bool,
    ) -> Option<TripState> {
        // Each iteration either returns or removes one step, so this runs
        // at most len(remaining_steps) times.
        loop {
            let current = remaining_steps.first()?;
            let snap = snap_to_linestring(&location.coordinates, &current.geometry)?;
            let distance_to_next_maneuver_m =
                remaining_on_segments(&current.geometry, snap.segment_index, snap.t);

            let advance = allow_policy_advance
                && should_advance_step(
                    &self.config.step_advance,
                    &location,
                    current,
                    remaining_steps.get(1),
                );

            if advance {
                let finished = remaining_steps.remove(0);
                debug!("Finished step: {}", finished.instruction);
                retire_break_waypoint(&finished, &mut remaining_waypoints);
                if remaining_steps.is_empty() {
                    info!("Trip complete: final step finished");
                    return Some(TripState::Complete);
                }
                continue;
            }

            let deviation = check_route_deviation(
                &self.config.route_deviation_tracking,
                &location,
                &self.route,
                &remaining_steps,
            );

            let current = &remaining_steps[0];
            let visual_instruction =
                select_visual_instruction(current, distance_to_next_maneuver_m).cloned();
            let spoken_instruction =
                select_spoken_instruction(current, distance_to_next_maneuver_m).cloned();

            let snapped_location = UserLocation {
                coordinates: snap.point,
                ..location
            };

            return Some(TripState::Navigating {
                snapped_location,
                remaining_steps,
                remaining_waypoints,
                distance_to_next_maneuver_m,
                deviation,
                visual_instruction,
                spoken_instruction,
            });
        }
    }
}

/// Drop the first break waypoint matching the finished step's end.
///
/// Via waypoints are pass-through constraints and are not retired here;
/// breaks are coupled to step boundaries because routing engines always
/// end a leg on one.
fn retire_break_waypoint(finished: &RouteStep, remaining_waypoints: &mut Vec<Waypoint>) {
    let Some(end) = finished.end() else {
        return;
    };
    if let Some(index) = remaining_waypoints.iter().position(|w| {
        w.kind == WaypointKind::Break && w.coordinate.approx_eq(end, WAYPOINT_EPSILON_DEG)
    }) {
        debug!(
            "Visited break waypoint ({}, {})",
            remaining_waypoints[index].coordinate.lat, remaining_waypoints[index].coordinate.lng
        );
        remaining_waypoints.remove(index);
    }
}
