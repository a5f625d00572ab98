//! Error types for MargaNav.
//!
//! Errors surface from constructors and parsers only. The navigation
//! controller's update and advance operations never fail: on implausible
//! input they degrade to a well-formed state carrying the last good
//! snapped location.

use thiserror::Error;

/// MargaNav error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MargaError {
    /// Route or step geometry failed a model invariant at construction.
    #[error("Route invariant violated: {detail}")]
    RouteInvariantViolation { detail: String },

    /// A route adapter could not parse provider bytes.
    #[error("Failed to parse route response: {detail}")]
    ParseError { detail: String },

    /// A route adapter could not produce a request.
    #[error("Failed to generate route request: {detail}")]
    RequestGenerationError { detail: String },

    /// A user location was ill-formed (e.g. negative horizontal accuracy).
    #[error("Invalid user location: {detail}")]
    NoUserLocation { detail: String },
}

impl MargaError {
    /// Build a `RouteInvariantViolation` from a detail message.
    pub(crate) fn invariant(detail: impl Into<String>) -> Self {
        Self::RouteInvariantViolation {
            detail: detail.into(),
        }
    }

    /// Build a `ParseError` from a detail message.
    pub(crate) fn parse(detail: impl Into<String>) -> Self {
        Self::ParseError {
            detail: detail.into(),
        }
    }
}

impl From<serde_json::Error> for MargaError {
    fn from(e: serde_json::Error) -> Self {
        MargaError::ParseError {
            detail: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MargaError>;
