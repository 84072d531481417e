use thiserror::Error;

/// Errors raised while locating or loading configuration files.
///
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Bad config file version v{0}, need v{1}")]
    BadVersion(usize, usize),
    #[error("Unknown config file {0} and no default in {1}")]
    MissingFile(String, String),
    #[error("No HOME variable defined, can not continue")]
    NoHome,
    #[error("Unknown location {0}")]
    UnknownLocation(String),
}
