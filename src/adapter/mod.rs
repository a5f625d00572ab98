//! Route provider seams.
//!
//! The core never performs network I/O. Hosts obtain routes in one of two
//! shapes:
//!
//! - A [`RouteRequestGenerator`] / [`RouteResponseParser`] pair: the host
//!   executes the generated request with its own HTTP stack and hands the
//!   raw response bytes back for parsing. The bundled
//!   [`OsrmResponseParser`] and [`ValhallaHttpRequestGenerator`] cover
//!   OSRM-compatible engines.
//! - A [`CustomRouteProvider`]: fully host-implemented async route
//!   acquisition (local routing, canned fixtures, proprietary APIs).

pub mod osrm;
pub mod polyline;

pub use osrm::{OsrmResponseParser, ValhallaHttpRequestGenerator};

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::UserLocation;
use crate::error::Result;
use crate::route::{Route, Waypoint};

/// A routing request for the host to execute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RouteRequest {
    /// POST `body` to `url` with the given headers.
    HttpPost {
        url: String,
        headers: HashMap<String, String>,
        body: Vec<u8>,
    },
}

/// Builds provider requests from the user's position and target waypoints.
pub trait RouteRequestGenerator: Send + Sync {
    /// Generate a request routing from `user_location` through `waypoints`.
    ///
    /// Fails with [`MargaError::RequestGenerationError`](crate::MargaError)
    /// when no request can be formed (e.g. no waypoints).
    fn generate_request(
        &self,
        user_location: &UserLocation,
        waypoints: &[Waypoint],
    ) -> Result<RouteRequest>;
}

/// Parses provider response bytes into validated routes.
pub trait RouteResponseParser: Send + Sync {
    /// Parse a raw response body.
    ///
    /// Fails with [`MargaError::ParseError`](crate::MargaError) on
    /// malformed input.
    fn parse_response(&self, response: &[u8]) -> Result<Vec<Route>>;
}

/// Fully host-implemented route acquisition.
#[async_trait]
pub trait CustomRouteProvider: Send + Sync {
    /// Fetch routes from `user_location` through `waypoints`.
    async fn get_routes(
        &self,
        user_location: &UserLocation,
        waypoints: &[Waypoint],
    ) -> Result<Vec<Route>>;
}
