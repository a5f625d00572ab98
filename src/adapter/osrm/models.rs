//! Wire models for OSRM-compatible route responses.
//!
//! These structs mirror the subset of the OSRM/Valhalla JSON shape the
//! bundled parser consumes; mapping to the crate's route model happens in
//! the parent module. Locations on the wire are `[longitude, latitude]`.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmRouteResponse {
    #[serde(default)]
    pub code: Option<String>,
    pub routes: Vec<OsrmRoute>,
    #[serde(default)]
    pub waypoints: Vec<OsrmWaypoint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmWaypoint {
    pub location: [f64; 2],
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmRoute {
    pub distance: f64,
    pub legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmLeg {
    pub steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OsrmStep {
    pub distance: f64,
    #[serde(default)]
    pub name: Option<String>,
    pub geometry: OsrmGeometry,
    pub maneuver: OsrmManeuver,
    #[serde(default)]
    pub voice_instructions: Vec<OsrmVoiceInstruction>,
    #[serde(default)]
    pub banner_instructions: Vec<OsrmBannerInstruction>,
}

/// Step geometry arrives either as an encoded polyline string, a bare
/// coordinate list, or a GeoJSON LineString object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OsrmGeometry {
    Polyline(String),
    Coordinates(Vec<[f64; 2]>),
    GeoJson { coordinates: Vec<[f64; 2]> },
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmManeuver {
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(rename = "type", default)]
    pub maneuver_type: Option<String>,
    #[serde(default)]
    pub modifier: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OsrmVoiceInstruction {
    pub distance_along_geometry: f64,
    pub announcement: String,
    #[serde(default)]
    pub ssml_announcement: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OsrmBannerInstruction {
    pub distance_along_geometry: f64,
    pub primary: OsrmBannerContent,
    #[serde(default)]
    pub secondary: Option<OsrmBannerContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmBannerContent {
    pub text: String,
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub modifier: Option<String>,
    #[serde(default)]
    pub degrees: Option<f64>,
}
