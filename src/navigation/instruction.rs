//! Instruction trigger selection.
//!
//! A step carries banner and utterance lists, each entry with a trigger
//! distance before the maneuver. Selection picks the entry whose trigger
//! band the user is inside: the smallest trigger that is at least the
//! remaining distance. Ahead of all trigger bands, the widest entry is
//! shown so guidance is never blank on a long step. Ties break by list
//! order, so selection is stable across ticks.

use std::collections::HashSet;

use uuid::Uuid;

use crate::route::{RouteStep, SpokenInstruction, VisualInstruction};

/// Select the banner to display for the active step.
pub fn select_visual_instruction(
    step: &RouteStep,
    distance_to_maneuver_m: f64,
) -> Option<&VisualInstruction> {
    select_by_trigger(
        &step.visual_instructions,
        distance_to_maneuver_m,
        |v| v.trigger_distance_before_maneuver_m,
    )
}

/// Select the utterance to speak for the active step.
pub fn select_spoken_instruction(
    step: &RouteStep,
    distance_to_maneuver_m: f64,
) -> Option<&SpokenInstruction> {
    select_by_trigger(
        &step.spoken_instructions,
        distance_to_maneuver_m,
        |s| s.trigger_distance_before_maneuver_m,
    )
}

/// The smallest trigger >= remaining distance, else the largest trigger.
/// First entry wins ties in both cases.
fn select_by_trigger<T>(items: &[T], remaining_m: f64, trigger: impl Fn(&T) -> f64) -> Option<&T> {
    let mut tightest: Option<&T> = None;
    let mut widest: Option<&T> = None;

    for item in items {
        let t = trigger(item);
        if t >= remaining_m {
            let replace = match tightest {
                Some(best) => t < trigger(best),
                None => true,
            };
            if replace {
                tightest = Some(item);
            }
        }
        let replace = match widest {
            Some(best) => t > trigger(best),
            None => true,
        };
        if replace {
            widest = Some(item);
        }
    }

    tightest.or(widest)
}

/// Host-side at-most-once filter for spoken instructions.
///
/// The controller reports the active utterance on every tick it remains
/// selected; feeding each reported instruction through the tracker yields
/// `true` only the first time its `utterance_id` is seen. Clear the
/// tracker when navigation stops or a new route is accepted.
#[derive(Clone, Debug, Default)]
pub struct UtteranceTracker {
    spoken: HashSet<Uuid>,
}

impl UtteranceTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an utterance; returns `true` if it has not been spoken yet.
    pub fn should_speak(&mut self, instruction: &SpokenInstruction) -> bool {
        self.spoken.insert(instruction.utterance_id)
    }

    /// Number of distinct utterances recorded.
    pub fn len(&self) -> usize {
        self.spoken.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.spoken.is_empty()
    }

    /// Forget all recorded utterances.
    pub fn clear(&mut self) {
        self.spoken.clear();
    }
}
