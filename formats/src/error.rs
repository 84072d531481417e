use thiserror::Error;

/// Decoding errors for the STM payload.
///
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormatError {
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Feature #{0} has bad coordinates")]
    BadCoordinates(usize),
}
