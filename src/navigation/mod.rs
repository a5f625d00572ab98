//! Turn-by-turn navigation: policies, trip state, and the controller.
//!
//! # Architecture
//!
//! ```text
//! UserLocation (host)        ← one fix per tick
//!     │
//!     │ update_user_location()
//!     ▼
//! NavigationController       ← owns Route + config, stateless otherwise
//!     │ snap → advance? → deviation → instructions
//!     ▼
//! TripState                  ← value returned to the host
//! ```
//!
//! The host inspects each returned [`TripState`] to drive side effects:
//! speak the selected instruction (deduplicated with
//! [`UtteranceTracker`]), redraw the map from the snapped location, and
//! request a recalculation when `deviation` reports off-route.
//!
//! # Key Types
//!
//! - [`NavigationController`]: pure `(TripState, UserLocation) -> TripState`
//! - [`NavigationControllerConfig`]: step-advance and deviation policies
//! - [`TripState`]: `Navigating` snapshot or terminal `Complete`

mod config;
mod controller;
mod deviation;
pub mod instruction;
mod state;
mod step_advance;

pub use config::{
    NavigationControllerConfig, RouteDeviationDetector, RouteDeviationTracking, StepAdvanceMode,
};
pub use controller::NavigationController;
pub use instruction::{select_spoken_instruction, select_visual_instruction, UtteranceTracker};
pub use state::{DeviationResult, TripProgress, TripState};
