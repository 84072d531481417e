//! Configuration for `stmctl`
//!
//! Everything in `config.hcl` is optional and so is the file itself:
//!
//! ```hcl
//! version = 1
//!
//! site = "stm"
//! line = "405"
//!
//! location "casa" {
//!   lat = -34.9011
//!   lon = -56.1645
//! }
//! ```
//!

use std::collections::BTreeMap;
use std::path::Path;

use eyre::Result;
use serde::Deserialize;
use tracing::{debug, trace};

use stm_common::{load_locations, ConfigFile, Location, Versioned};
use stm_macros::add_version;

/// Site used when nothing is configured
pub const DEF_SITE: &str = "stm";

#[add_version(1)]
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Site to query
    #[serde(default)]
    pub site: Option<String>,
    /// Default line
    #[serde(default)]
    pub line: Option<String>,
    /// Additional named locations
    #[serde(default)]
    pub location: BTreeMap<String, Location>,
}

impl Config {
    /// Load `fname` if given, the default file if present and defaults otherwise.
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&Path>) -> Result<Config> {
        if fname.is_none() && !ConfigFile::<Config>::default_file()?.exists() {
            debug!("no config file, using defaults");
            return Ok(Config::new());
        }
        let cfg = ConfigFile::<Config>::load(fname)?;
        Ok(cfg.into_inner())
    }

    /// Site name to use.
    ///
    pub fn site(&self) -> &str {
        self.site.as_deref().unwrap_or(DEF_SITE)
    }

    /// Built-in locations, overridden by ours.
    ///
    #[tracing::instrument(skip(self))]
    pub fn locations(&self) -> Result<BTreeMap<String, Location>> {
        trace!("merging {} location(s)", self.location.len());

        let mut all = load_locations(None)?;
        all.extend(self.location.iter().map(|(k, v)| (k.clone(), *v)));
        Ok(all)
    }
}
