use thiserror::Error;

/// Custom error type for a vehicle query.
///
/// Anything that went wrong before we had a complete answer is a network error, anything
/// wrong with the answer itself is a malformed response.
///
#[derive(Clone, Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Custom error type for the access module, allow us to differentiate between errors.
///
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Bad configuration parameter: {0}")]
    BadParam(String),
    #[error("No such site {0}")]
    UnknownSite(String),
    #[error("Invalid site {0}")]
    InvalidSite(String),
    #[error("Site {0} has no route {1}")]
    MissingRoute(String, String),
}
