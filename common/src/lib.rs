//! This library is there to share some common code amongst all STM tracker modules.
//!
//! - logging initialisation
//! - versioned configuration file loading
//! - named locations
//!

mod config;
mod error;
mod location;
mod logging;
mod macros;

use clap::{crate_name, crate_version};
pub use config::*;
pub use error::*;
pub use location::*;
pub use logging::*;

const NAME: &str = crate_name!();
const VERSION: &str = crate_version!();

/// Every configuration file carries a version number, checked on load.
///
pub trait Versioned {
    /// Version this code expects.
    const VERSION: usize;

    /// Version found in the file.
    fn version(&self) -> usize;
}

pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}
