//! Visual and spoken guidance instruction types.
//!
//! Instructions belong to a [`RouteStep`](crate::route::RouteStep) and
//! carry the distance before the step's maneuver at which they become
//! active. Selection of the currently active instruction happens in
//! [`navigation::instruction`](crate::navigation::instruction).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maneuver category, following the OSRM vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManeuverType {
    Turn,
    #[serde(rename = "new name")]
    NewName,
    Depart,
    Arrive,
    Merge,
    #[serde(rename = "on ramp")]
    OnRamp,
    #[serde(rename = "off ramp")]
    OffRamp,
    Fork,
    #[serde(rename = "end of road")]
    EndOfRoad,
    Continue,
    Roundabout,
    Rotary,
    #[serde(rename = "roundabout turn")]
    RoundaboutTurn,
    Notification,
    #[serde(rename = "exit roundabout")]
    ExitRoundabout,
    #[serde(rename = "exit rotary")]
    ExitRotary,
}

/// Direction qualifier for a maneuver, following the OSRM vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManeuverModifier {
    UTurn,
    #[serde(rename = "sharp right")]
    SharpRight,
    Right,
    #[serde(rename = "slight right")]
    SlightRight,
    Straight,
    #[serde(rename = "slight left")]
    SlightLeft,
    Left,
    #[serde(rename = "sharp left")]
    SharpLeft,
}

/// The textual content of one visual instruction banner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualInstructionContent {
    /// Text to display.
    pub text: String,
    /// Maneuver category, when known.
    pub maneuver_type: Option<ManeuverType>,
    /// Maneuver direction qualifier, when known.
    pub maneuver_modifier: Option<ManeuverModifier>,
    /// Turn angle through a roundabout, in degrees.
    pub roundabout_exit_degrees: Option<u16>,
}

/// A banner shown to the user ahead of a maneuver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualInstruction {
    /// Primary banner content.
    pub primary: VisualInstructionContent,
    /// Optional secondary content (e.g. a lane hint or exit number).
    pub secondary: Option<VisualInstructionContent>,
    /// Distance before the maneuver at which this banner becomes active.
    pub trigger_distance_before_maneuver_m: f64,
}

/// One logical spoken guidance event.
///
/// The `utterance_id` is stable for the lifetime of the owning route, so a
/// host can key an already-spoken set on it and speak each utterance at
/// most once even when the same instruction is selected on several ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpokenInstruction {
    /// Plain text to speak.
    pub text: String,
    /// SSML markup for engines that support it.
    pub ssml: Option<String>,
    /// Distance before the maneuver at which this utterance becomes active.
    pub trigger_distance_before_maneuver_m: f64,
    /// Stable identifier for at-most-once delivery.
    pub utterance_id: Uuid,
}

impl SpokenInstruction {
    /// Create a spoken instruction with a freshly assigned utterance id.
    pub fn new(text: String, ssml: Option<String>, trigger_distance_before_maneuver_m: f64) -> Self {
        Self {
            text,
            ssml,
            trigger_distance_before_maneuver_m,
            utterance_id: Uuid::new_v4(),
        }
    }
}
