use serde::Serialize;
use thiserror::Error;

use stm_sources::QueryError;

/// Why we could not get a position.
///
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Everything a session can fail on.  None of these are fatal, the last one is kept in the
/// session context for whoever wants to show it.
///
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
pub enum SessionError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<LocationError> for SessionError {
    fn from(value: LocationError) -> Self {
        match value {
            LocationError::PermissionDenied => SessionError::PermissionDenied,
            LocationError::Unavailable(s) => SessionError::LocationUnavailable(s),
        }
    }
}

impl From<QueryError> for SessionError {
    fn from(value: QueryError) -> Self {
        match value {
            QueryError::NetworkError(s) => SessionError::NetworkError(s),
            QueryError::MalformedResponse(s) => SessionError::MalformedResponse(s),
        }
    }
}

impl SessionError {
    /// Location failures keep the session in `Initializing`.
    ///
    pub fn is_location(&self) -> bool {
        matches!(
            self,
            SessionError::PermissionDenied | SessionError::LocationUnavailable(_)
        )
    }
}
