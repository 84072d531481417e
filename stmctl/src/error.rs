//! Error module
//!

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Status {
    #[error("Bad position {0}, use LAT,LON")]
    BadPosition(String),
    #[error("No position: {0}")]
    NoPosition(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("No answer after {0}s")]
    Timeout(u64),
}
