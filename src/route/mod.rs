//! The immutable route model.
//!
//! A [`Route`] is an ordered sequence of [`RouteStep`]s from an origin to
//! a final waypoint. Each step owns the polyline for one maneuver segment
//! together with the instructions that announce the maneuver. Routes are
//! validated once at construction; the navigation controller relies on
//! those invariants holding for the whole session.

mod instruction;

pub use instruction::{
    ManeuverModifier, ManeuverType, SpokenInstruction, VisualInstruction,
    VisualInstructionContent,
};

use serde::{Deserialize, Serialize};

use crate::core::{haversine_distance_m, BoundingBox, GeographicCoordinate};
use crate::error::{MargaError, Result};

/// Tolerance for matching shared coordinates between adjacent steps.
///
/// Polyline wire formats quantize to a 1e-5 or 1e-6 degree grid; two steps
/// sharing an endpoint may disagree below that after decoding.
const CHAIN_EPSILON_DEG: f64 = 1e-7;

/// Kind of a route waypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaypointKind {
    /// A stopping point; routes are split into legs at breaks.
    Break,
    /// A pass-through constraint the route must visit without stopping.
    Via,
}

/// A point the route was requested to pass through.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Waypoint position.
    pub coordinate: GeographicCoordinate,
    /// Stop or pass-through.
    pub kind: WaypointKind,
}

impl Waypoint {
    /// Create a new waypoint.
    #[inline]
    pub fn new(coordinate: GeographicCoordinate, kind: WaypointKind) -> Self {
        Self { coordinate, kind }
    }
}

/// One maneuver segment of a route.
///
/// The step's polyline starts where the previous step's polyline ends and
/// runs to the maneuver point that begins the next step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Step polyline; always at least 2 points in a validated route.
    pub geometry: Vec<GeographicCoordinate>,
    /// Step length in meters as reported by the routing engine.
    pub distance_m: f64,
    /// Road name, when the engine knows it.
    pub road_name: Option<String>,
    /// Human-readable maneuver instruction (e.g. "Turn left onto Main St").
    pub instruction: String,
    /// Banners announcing the maneuver at the end of this step.
    pub visual_instructions: Vec<VisualInstruction>,
    /// Utterances announcing the maneuver at the end of this step.
    pub spoken_instructions: Vec<SpokenInstruction>,
}

impl RouteStep {
    /// Create a step without instructions.
    pub fn new(
        geometry: Vec<GeographicCoordinate>,
        distance_m: f64,
        road_name: Option<String>,
        instruction: String,
    ) -> Self {
        Self {
            geometry,
            distance_m,
            road_name,
            instruction,
            visual_instructions: Vec::new(),
            spoken_instructions: Vec::new(),
        }
    }

    /// Attach visual instructions.
    pub fn with_visual_instructions(mut self, instructions: Vec<VisualInstruction>) -> Self {
        self.visual_instructions = instructions;
        self
    }

    /// Attach spoken instructions.
    pub fn with_spoken_instructions(mut self, instructions: Vec<SpokenInstruction>) -> Self {
        self.spoken_instructions = instructions;
        self
    }

    /// First point of the step polyline.
    #[inline]
    pub fn start(&self) -> Option<&GeographicCoordinate> {
        self.geometry.first()
    }

    /// Last point of the step polyline (the maneuver point).
    #[inline]
    pub fn end(&self) -> Option<&GeographicCoordinate> {
        self.geometry.last()
    }

    /// Validate the step's own invariants.
    fn validate(&self, index: usize) -> Result<()> {
        if self.geometry.len() < 2 {
            return Err(MargaError::invariant(format!(
                "step {} has {} geometry points (minimum 2)",
                index,
                self.geometry.len()
            )));
        }
        if let Some(bad) = self.geometry.iter().find(|c| !c.is_valid()) {
            return Err(MargaError::invariant(format!(
                "step {} contains out-of-range coordinate ({}, {})",
                index, bad.lat, bad.lng
            )));
        }
        if !self.distance_m.is_finite() || self.distance_m < 0.0 {
            return Err(MargaError::invariant(format!(
                "step {} has negative distance {}",
                index, self.distance_m
            )));
        }
        if self
            .visual_instructions
            .iter()
            .map(|v| v.trigger_distance_before_maneuver_m)
            .chain(
                self.spoken_instructions
                    .iter()
                    .map(|s| s.trigger_distance_before_maneuver_m),
            )
            .any(|d| !d.is_finite() || d <= 0.0)
        {
            return Err(MargaError::invariant(format!(
                "step {} has an instruction with a non-positive trigger distance",
                index
            )));
        }
        Ok(())
    }
}

/// A complete routing engine result, validated and immutable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Full route polyline (concatenated step polylines).
    pub geometry: Vec<GeographicCoordinate>,
    /// Bounding box of the route geometry.
    pub bbox: BoundingBox,
    /// Total route length in meters.
    pub distance_m: f64,
    /// Waypoints the route was requested through, in visit order.
    pub waypoints: Vec<Waypoint>,
    /// Maneuver steps, in travel order.
    pub steps: Vec<RouteStep>,
}

impl Route {
    /// Create a route, validating the full model.
    ///
    /// Checks coordinate ranges, the 2-point step minimum, step chaining
    /// (each step starts where the previous one ends), and that the route
    /// geometry equals the step polylines concatenated with shared
    /// endpoints dropped.
    pub fn new(
        geometry: Vec<GeographicCoordinate>,
        distance_m: f64,
        waypoints: Vec<Waypoint>,
        steps: Vec<RouteStep>,
    ) -> Result<Self> {
        if steps.is_empty() {
            return Err(MargaError::invariant("route has no steps"));
        }
        for (i, step) in steps.iter().enumerate() {
            step.validate(i)?;
        }
        for i in 1..steps.len() {
            if let (Some(prev_end), Some(start)) = (steps[i - 1].end(), steps[i].start()) {
                if !start.approx_eq(prev_end, CHAIN_EPSILON_DEG) {
                    return Err(MargaError::invariant(format!(
                        "step {} starts at ({}, {}) but step {} ends at ({}, {})",
                        i,
                        start.lat,
                        start.lng,
                        i - 1,
                        prev_end.lat,
                        prev_end.lng
                    )));
                }
            }
        }

        let concatenated = concat_step_geometries(&steps);
        if geometry.len() != concatenated.len()
            || geometry
                .iter()
                .zip(&concatenated)
                .any(|(a, b)| !a.approx_eq(b, CHAIN_EPSILON_DEG))
        {
            return Err(MargaError::invariant(
                "route geometry does not equal the concatenated step geometries",
            ));
        }

        if let Some(bad) = waypoints.iter().find(|w| !w.coordinate.is_valid()) {
            return Err(MargaError::invariant(format!(
                "waypoint at ({}, {}) is out of range",
                bad.coordinate.lat, bad.coordinate.lng
            )));
        }
        if !distance_m.is_finite() || distance_m < 0.0 {
            return Err(MargaError::invariant(format!(
                "route has negative distance {}",
                distance_m
            )));
        }

        let bbox = BoundingBox::from_coordinates(&geometry)
            .ok_or_else(|| MargaError::invariant("route geometry is empty"))?;

        Ok(Self {
            geometry,
            bbox,
            distance_m,
            waypoints,
            steps,
        })
    }

    /// Create a route from its steps, deriving the full geometry by
    /// concatenation and the total distance by summing step distances.
    pub fn from_steps(waypoints: Vec<Waypoint>, steps: Vec<RouteStep>) -> Result<Self> {
        let geometry = concat_step_geometries(&steps);
        let distance_m = steps.iter().map(|s| s.distance_m).sum();
        Self::new(geometry, distance_m, waypoints, steps)
    }

    /// Total great-circle length of the route polyline.
    ///
    /// This is derived from the geometry; `distance_m` is whatever the
    /// routing engine reported and may differ slightly.
    pub fn geometry_length_m(&self) -> f64 {
        self.geometry
            .windows(2)
            .map(|w| haversine_distance_m(&w[0], &w[1]))
            .sum()
    }
}

/// Concatenate step polylines, dropping the shared endpoint between
/// adjacent steps.
pub(crate) fn concat_step_geometries(steps: &[RouteStep]) -> Vec<GeographicCoordinate> {
    let mut geometry: Vec<GeographicCoordinate> = Vec::new();
    for step in steps {
        let skip = usize::from(!geometry.is_empty());
        geometry.extend(step.geometry.iter().skip(skip).copied());
    }
    geometry
}
