//! Module to deal with the different kind of sites we can query for vehicle positions.
//!
//! A site is described in `sources.hcl` (base URL, operator, routes) and turned into a
//! `VehicleQueryService` implementation depending on its format.
//!
//! Each query is a single request/response exchange: no retry, no pagination and no timeout
//! besides the HTTP client defaults.
//!

use std::fmt::Debug;

use async_trait::async_trait;

use stm_formats::{Format, VehicleRecord};

// Re-export these modules for a shorted import path.
//
pub use access::*;
pub use config::*;
pub use error::*;
pub use route::*;
pub use site::*;

#[macro_use]
mod macros;

mod access;
mod config;
mod error;
mod route;
mod site;

/// Default configuration filename
pub const SOURCES_CONFIG: &str = "sources.hcl";

/// This trait hides how a given site is queried for the positions of every vehicle running
/// on a set of lines for a given operator.
///
#[async_trait]
pub trait VehicleQueryService: Debug + Send + Sync {
    /// Return site's name
    fn name(&self) -> String;
    /// Operator identifier configured for the site
    fn operator(&self) -> String;
    /// Fetch the current positions, in the order given by the site
    async fn fetch(
        &self,
        operator: &str,
        lines: &[String],
    ) -> Result<Vec<VehicleRecord>, QueryError>;
    /// Returns the input format
    fn format(&self) -> Format;
}

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
