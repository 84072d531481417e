//!  Module that defines what is a site (API endpoint)
//!
//! This is used to configure the list of possible sources through `sources.hcl`.
//!
//! You can define a set of possible routes for a site depending on how the API/site is
//! designed, the STM service only needs `get`.
//!

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use stm_formats::Format;

use crate::Routes;

/// Describe what a site is.
///
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Site {
    /// Name of the site, filled from the block label
    #[serde(default)]
    pub name: String,
    /// Type of input
    pub format: String,
    /// Base URL (to avoid repeating)
    pub base_url: String,
    /// Operator identifier sent with every query
    pub operator: String,
    /// Different URLs available
    pub routes: Option<Routes>,
}

impl Site {
    /// Basic `new()`
    ///
    pub fn new() -> Self {
        Site::default()
    }

    /// Return the site format
    ///
    pub fn format(&self) -> Format {
        self.format.parse().unwrap_or_default()
    }

    /// Return the list of routes
    ///
    pub fn list(&self) -> Vec<&String> {
        match &self.routes {
            Some(routes) => routes.keys().collect::<Vec<_>>(),
            _ => vec![],
        }
    }

    /// Check whether site has the mentioned route
    ///
    pub fn has(&self, meth: &str) -> bool {
        match &self.routes {
            Some(routes) => routes.contains_key(meth),
            _ => false,
        }
    }

    /// Retrieve a route
    ///
    pub fn route(&self, key: &str) -> Option<&String> {
        match &self.routes {
            Some(routes) => routes.get(key),
            _ => None,
        }
    }
}

impl Display for Site {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) {} operator={} routes={:?}",
            self.name,
            self.format,
            self.base_url,
            self.operator,
            self.list()
        )
    }
}
