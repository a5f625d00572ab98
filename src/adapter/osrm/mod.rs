//! Bundled adapter for OSRM-compatible routing engines.
//!
//! [`OsrmResponseParser`] consumes the OSRM-flavored JSON emitted by
//! Valhalla (and OSRM itself) including Mapbox-style `voiceInstructions`
//! and `bannerInstructions` arrays. [`ValhallaHttpRequestGenerator`]
//! produces the matching POST request with `format: osrm`.

mod models;

use std::collections::HashMap;

use log::warn;
use serde_json::json;

use crate::adapter::polyline::decode_polyline;
use crate::adapter::{RouteRequest, RouteRequestGenerator, RouteResponseParser};
use crate::core::{GeographicCoordinate, UserLocation};
use crate::error::{MargaError, Result};
use crate::route::{
    concat_step_geometries, ManeuverModifier, ManeuverType, Route, RouteStep, SpokenInstruction,
    VisualInstruction, VisualInstructionContent, Waypoint, WaypointKind,
};

use models::{
    OsrmBannerContent, OsrmGeometry, OsrmRoute, OsrmRouteResponse, OsrmStep,
};

/// Parser for OSRM-compatible route responses.
pub struct OsrmResponseParser {
    polyline_precision: u32,
}

impl OsrmResponseParser {
    /// Create a parser expecting encoded polylines of the given precision.
    ///
    /// Valhalla's OSRM output uses precision 6; classic OSRM uses 5.
    pub fn new(polyline_precision: u32) -> Self {
        Self { polyline_precision }
    }

    fn convert_route(&self, osrm_route: OsrmRoute, waypoints: &[Waypoint]) -> Result<Route> {
        let mut steps = Vec::new();
        for leg in osrm_route.legs {
            for step in leg.steps {
                steps.push(self.convert_step(step)?);
            }
        }

        let geometry = concat_step_geometries(&steps);
        Route::new(geometry, osrm_route.distance, waypoints.to_vec(), steps)
            .map_err(|e| MargaError::parse(format!("response violates the route model: {e}")))
    }

    fn convert_step(&self, step: OsrmStep) -> Result<RouteStep> {
        let geometry = match step.geometry {
            OsrmGeometry::Polyline(encoded) => {
                decode_polyline(&encoded, self.polyline_precision)?
            }
            OsrmGeometry::Coordinates(pairs) | OsrmGeometry::GeoJson { coordinates: pairs } => {
                pairs
                    .iter()
                    .map(|p| GeographicCoordinate::new(p[1], p[0]))
                    .collect()
            }
        };

        let visual_instructions = step
            .banner_instructions
            .iter()
            .filter(|banner| {
                let ok = banner.distance_along_geometry > 0.0;
                if !ok {
                    warn!("Dropping banner with non-positive trigger distance");
                }
                ok
            })
            .map(|banner| VisualInstruction {
                primary: convert_banner_content(&banner.primary),
                secondary: banner.secondary.as_ref().map(convert_banner_content),
                trigger_distance_before_maneuver_m: banner.distance_along_geometry,
            })
            .collect();

        let spoken_instructions = step
            .voice_instructions
            .iter()
            .filter(|voice| {
                let ok = voice.distance_along_geometry > 0.0;
                if !ok {
                    warn!("Dropping voice instruction with non-positive trigger distance");
                }
                ok
            })
            .map(|voice| {
                SpokenInstruction::new(
                    voice.announcement.clone(),
                    voice.ssml_announcement.clone(),
                    voice.distance_along_geometry,
                )
            })
            .collect();

        let road_name = step.name.filter(|n| !n.is_empty());
        let instruction = step.maneuver.instruction.unwrap_or_default();

        Ok(
            RouteStep::new(geometry, step.distance, road_name, instruction)
                .with_visual_instructions(visual_instructions)
                .with_spoken_instructions(spoken_instructions),
        )
    }
}

impl RouteResponseParser for OsrmResponseParser {
    fn parse_response(&self, response: &[u8]) -> Result<Vec<Route>> {
        let parsed: OsrmRouteResponse = serde_json::from_slice(response)?;

        if let Some(code) = &parsed.code {
            if code != "Ok" {
                return Err(MargaError::parse(format!(
                    "provider returned code {code:?}"
                )));
            }
        }

        // OSRM waypoints are the snapped stopping points, in visit order
        let waypoints: Vec<Waypoint> = parsed
            .waypoints
            .iter()
            .map(|w| {
                Waypoint::new(
                    GeographicCoordinate::new(w.location[1], w.location[0]),
                    WaypointKind::Break,
                )
            })
            .collect();

        parsed
            .routes
            .into_iter()
            .map(|r| self.convert_route(r, &waypoints))
            .collect()
    }
}

fn convert_banner_content(content: &OsrmBannerContent) -> VisualInstructionContent {
    VisualInstructionContent {
        text: content.text.clone(),
        maneuver_type: content.content_type.as_deref().and_then(parse_maneuver_type),
        maneuver_modifier: content.modifier.as_deref().and_then(parse_maneuver_modifier),
        roundabout_exit_degrees: content.degrees.map(|d| d.round() as u16),
    }
}

// Unknown vocabulary degrades to None rather than failing the parse; the
// banner text still renders.
fn parse_maneuver_type(value: &str) -> Option<ManeuverType> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).ok()
}

fn parse_maneuver_modifier(value: &str) -> Option<ManeuverModifier> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).ok()
}

/// Request generator for Valhalla's OSRM-compatible endpoint.
pub struct ValhallaHttpRequestGenerator {
    endpoint_url: String,
    profile: String,
}

impl ValhallaHttpRequestGenerator {
    /// Create a generator posting to `endpoint_url` with the given costing
    /// profile (e.g. `"auto"`, `"bicycle"`, `"pedestrian"`).
    pub fn new(endpoint_url: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            profile: profile.into(),
        }
    }
}

impl RouteRequestGenerator for ValhallaHttpRequestGenerator {
    fn generate_request(
        &self,
        user_location: &UserLocation,
        waypoints: &[Waypoint],
    ) -> Result<RouteRequest> {
        if waypoints.is_empty() {
            return Err(MargaError::RequestGenerationError {
                detail: "at least one waypoint is required".to_string(),
            });
        }

        let mut locations = Vec::with_capacity(waypoints.len() + 1);
        locations.push(json!({
            "lat": user_location.coordinates.lat,
            "lon": user_location.coordinates.lng,
            "type": "break",
        }));
        for waypoint in waypoints {
            locations.push(json!({
                "lat": waypoint.coordinate.lat,
                "lon": waypoint.coordinate.lng,
                "type": match waypoint.kind {
                    WaypointKind::Break => "break",
                    WaypointKind::Via => "through",
                },
            }));
        }

        let body = json!({
            "format": "osrm",
            "costing": self.profile,
            "locations": locations,
            "voice_instructions": true,
            "banner_instructions": true,
        });
        let body = serde_json::to_vec(&body).map_err(|e| MargaError::RequestGenerationError {
            detail: e.to_string(),
        })?;

        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Ok(RouteRequest::HttpPost {
            url: self.endpoint_url.clone(),
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UserLocation;

    fn coord(lat: f64, lng: f64) -> GeographicCoordinate {
        GeographicCoordinate::new(lat, lng)
    }

    const COORDINATE_LIST_RESPONSE: &str = r#"{
        "code": "Ok",
        "routes": [{
            "distance": 222.0,
            "legs": [{
                "steps": [
                    {
                        "distance": 111.0,
                        "name": "First Street",
                        "geometry": [[0.0, 0.0], [0.001, 0.0]],
                        "maneuver": { "instruction": "Head east", "type": "depart" },
                        "voiceInstructions": [
                            { "distanceAlongGeometry": 100.0, "announcement": "Head east" }
                        ],
                        "bannerInstructions": [
                            {
                                "distanceAlongGeometry": 100.0,
                                "primary": { "text": "Turn left", "type": "turn", "modifier": "left" }
                            }
                        ]
                    },
                    {
                        "distance": 111.0,
                        "name": "",
                        "geometry": [[0.001, 0.0], [0.001, 0.001]],
                        "maneuver": { "instruction": "Turn left", "type": "turn", "modifier": "left" }
                    }
                ]
            }]
        }],
        "waypoints": [
            { "location": [0.0, 0.0] },
            { "location": [0.001, 0.001] }
        ]
    }"#;

    #[test]
    fn test_parses_coordinate_list_response() {
        let parser = OsrmResponseParser::new(6);
        let routes = parser
            .parse_response(COORDINATE_LIST_RESPONSE.as_bytes())
            .unwrap();

        assert_eq!(routes.len(), 1);
        let route = &routes[0];
        assert_eq!(route.distance_m, 222.0);
        assert_eq!(route.steps.len(), 2);
        assert_eq!(route.waypoints.len(), 2);

        let first = &route.steps[0];
        assert_eq!(first.road_name.as_deref(), Some("First Street"));
        assert_eq!(first.instruction, "Head east");
        assert_eq!(first.geometry[0], coord(0.0, 0.0));
        assert_eq!(first.spoken_instructions.len(), 1);
        assert_eq!(first.visual_instructions.len(), 1);

        let banner = &first.visual_instructions[0];
        assert_eq!(banner.primary.maneuver_type, Some(ManeuverType::Turn));
        assert_eq!(
            banner.primary.maneuver_modifier,
            Some(ManeuverModifier::Left)
        );

        // Empty road name becomes None
        assert!(route.steps[1].road_name.is_none());
    }

    #[test]
    fn test_parses_polyline_geometry() {
        // Same two points as the first step above, precision 6
        let response = r#"{
            "routes": [{
                "distance": 111.0,
                "legs": [{
                    "steps": [{
                        "distance": 111.0,
                        "geometry": "???o}@",
                        "maneuver": { "instruction": "Head east" }
                    }]
                }]
            }],
            "waypoints": []
        }"#;

        let parser = OsrmResponseParser::new(6);
        let routes = parser.parse_response(response.as_bytes()).unwrap();
        assert_eq!(routes[0].steps[0].geometry.len(), 2);
        assert!((routes[0].steps[0].geometry[1].lng - 0.001).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_error_code() {
        let parser = OsrmResponseParser::new(6);
        let err = parser
            .parse_response(br#"{"code": "NoRoute", "routes": [], "waypoints": []}"#)
            .unwrap_err();
        assert!(matches!(err, MargaError::ParseError { .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let parser = OsrmResponseParser::new(6);
        let err = parser.parse_response(b"not json at all").unwrap_err();
        assert!(matches!(err, MargaError::ParseError { .. }));
    }

    #[test]
    fn test_unknown_maneuver_vocabulary_degrades() {
        assert_eq!(parse_maneuver_type("hyperspace jump"), None);
        assert_eq!(parse_maneuver_type("turn"), Some(ManeuverType::Turn));
        assert_eq!(
            parse_maneuver_modifier("slight right"),
            Some(ManeuverModifier::SlightRight)
        );
    }

    #[test]
    fn test_request_generator_builds_post() {
        let generator = ValhallaHttpRequestGenerator::new("https://router.example/route", "auto");
        let location = UserLocation::new(coord(48.0, 16.0), 5.0);
        let waypoints = [
            Waypoint::new(coord(48.1, 16.1), WaypointKind::Via),
            Waypoint::new(coord(48.2, 16.2), WaypointKind::Break),
        ];

        let RouteRequest::HttpPost { url, headers, body } =
            generator.generate_request(&location, &waypoints).unwrap();

        assert_eq!(url, "https://router.example/route");
        assert_eq!(headers.get("Content-Type").unwrap(), "application/json");

        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["format"], "osrm");
        assert_eq!(body["costing"], "auto");
        let locations = body["locations"].as_array().unwrap();
        assert_eq!(locations.len(), 3);
        assert_eq!(locations[0]["type"], "break");
        assert_eq!(locations[1]["type"], "through");
        assert_eq!(locations[2]["type"], "break");
    }

    #[test]
    fn test_request_generator_requires_waypoints() {
        let generator = ValhallaHttpRequestGenerator::new("https://router.example/route", "auto");
        let location = UserLocation::new(coord(48.0, 16.0), 5.0);
        let err = generator.generate_request(&location, &[]).unwrap_err();
        assert!(matches!(err, MargaError::RequestGenerationError { .. }));
    }
}
