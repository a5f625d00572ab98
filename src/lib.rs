//! # MargaNav: a turn-by-turn navigation core
//!
//! A platform-independent navigation engine: given a computed route and a
//! stream of location fixes, it produces the snapped position, the active
//! step and distance to its maneuver, the visual and spoken instructions
//! to present now, a route-deviation verdict, and trip completion.
//!
//! The engine performs no I/O of any kind. Route fetching, GPS
//! acquisition, text-to-speech, and map rendering are host concerns; the
//! host observes each returned [`TripState`] and drives its side effects
//! from it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use marga_nav::{
//!     GeographicCoordinate, NavigationController, NavigationControllerConfig, Route,
//!     RouteStep, TripState, UserLocation,
//! };
//!
//! # fn example() -> Result<(), marga_nav::MargaError> {
//! let steps = vec![RouteStep::new(
//!     vec![
//!         GeographicCoordinate::new(0.0, 0.0),
//!         GeographicCoordinate::new(0.0, 0.001),
//!     ],
//!     111.0,
//!     None,
//!     "Head east".to_string(),
//! )];
//! let route = Route::from_steps(Vec::new(), steps)?;
//!
//! let controller = NavigationController::new(route, NavigationControllerConfig::default());
//! let fix = UserLocation::new(GeographicCoordinate::new(0.0, 0.0), 5.0);
//! let mut state = controller.initial_state(fix)?;
//!
//! // One tick per location fix
//! let next_fix = UserLocation::new(GeographicCoordinate::new(0.0, 0.0005), 5.0);
//! state = controller.update_user_location(state, next_fix);
//! if let TripState::Navigating { distance_to_next_maneuver_m, .. } = &state {
//!     println!("{:.0} m to the next maneuver", distance_to_next_maneuver_m);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    adapter/                         │  ← Provider seams
//! │     (request generation, OSRM parsing, polyline)    │
//! └─────────────────────────────────────────────────────┘
//!                          │ produces
//! ┌─────────────────────────────────────────────────────┐
//! │                     route/                          │  ← Immutable model
//! │        (Route, RouteStep, instructions)             │
//! └─────────────────────────────────────────────────────┘
//!                          │ navigated by
//! ┌─────────────────────────────────────────────────────┐
//! │                   navigation/                       │  ← State machine
//! │   (controller, step advance, deviation, triggers)   │
//! └─────────────────────────────────────────────────────┘
//!                          │ built on
//! ┌─────────────────────────────────────────────────────┐
//! │                      core/                          │  ← Foundation
//! │        (coordinates, geodesic math, snapping)       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! [`NavigationController`] is a pure function from `(TripState,
//! UserLocation)` to `TripState`: no clocks, no randomness, no locks, and
//! bounded work per tick. Hosts may run it anywhere as long as updates for
//! one session are applied in order.

pub mod adapter;
pub mod core;
pub mod error;
pub mod navigation;
pub mod route;

pub use adapter::{
    CustomRouteProvider, OsrmResponseParser, RouteRequest, RouteRequestGenerator,
    RouteResponseParser, ValhallaHttpRequestGenerator,
};
pub use crate::core::{BoundingBox, CourseOverGround, GeographicCoordinate, UserLocation};
pub use error::{MargaError, Result};
pub use navigation::{
    DeviationResult, NavigationController, NavigationControllerConfig, RouteDeviationDetector,
    RouteDeviationTracking, StepAdvanceMode, TripProgress, TripState, UtteranceTracker,
};
pub use route::{
    ManeuverModifier, ManeuverType, Route, RouteStep, SpokenInstruction, VisualInstruction,
    VisualInstructionContent, Waypoint, WaypointKind,
};
