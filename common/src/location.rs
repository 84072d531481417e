//! Named locations
//!
//! Used as a stand-in for the device position when running headless: the user can name one
//! of these instead of typing coordinates.
//!
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use eyre::Result;
use serde::Deserialize;
use stm_macros::add_version;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::trace;

use crate::{ConfigError, Versioned};

/// Actual location
///
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
pub struct Location {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lon: f64,
}

/// On-disk structure for the locations file
///
#[add_version(1)]
#[derive(Debug, Default, Deserialize)]
struct LocationsFile {
    /// List of locations
    pub location: BTreeMap<String, Location>,
}

/// Load all locations, either from `fname` or from the embedded list.
///
#[tracing::instrument]
pub fn load_locations(fname: Option<&Path>) -> Result<BTreeMap<String, Location>> {
    trace!("enter");

    // Load from file if specified
    //
    let data = if let Some(fname) = fname {
        fs::read_to_string(fname)?
    } else {
        include_str!("locations.hcl").to_owned()
    };

    let loc: LocationsFile = hcl::from_str(&data)?;
    if loc.version() != LocationsFile::VERSION {
        return Err(ConfigError::BadVersion(loc.version(), LocationsFile::VERSION).into());
    }
    Ok(loc.location)
}

/// Find one location by name.
///
#[tracing::instrument(skip(data))]
pub fn find_location(data: &BTreeMap<String, Location>, name: &str) -> Result<Location> {
    data.get(name)
        .copied()
        .ok_or_else(|| ConfigError::UnknownLocation(name.to_string()).into())
}

/// List loaded locations
///
#[tracing::instrument(skip(data))]
pub fn list_locations(data: &BTreeMap<String, Location>) -> Result<String> {
    trace!("enter");
    let header = vec!["Location", "Lat/Lon"];

    let mut builder = Builder::default();
    builder.push_record(header);

    data.iter().for_each(|(name, loc)| {
        let point = format!("{:.4}, {:.4}", loc.lat, loc.lon);
        builder.push_record(vec![name.clone(), point]);
    });

    let allf = builder.build().with(Style::modern()).to_string();
    Ok(format!("List all locations:\n{allf}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::info;

    #[test_pretty_log::test]
    fn test_load_default_locations() -> Result<()> {
        let all = load_locations(None)?;
        info!("{} locations", all.len());

        assert_eq!(4, all.len());
        assert!(all.contains_key("centro"));
        Ok(())
    }

    #[test_pretty_log::test]
    fn test_find_location() -> Result<()> {
        let all = load_locations(None)?;

        let loc = find_location(&all, "tres-cruces")?;
        assert_eq!(-34.8941, loc.lat);
        assert_eq!(-56.1664, loc.lon);

        assert!(find_location(&all, "atlantis").is_err());
        Ok(())
    }

    #[test]
    fn test_list_locations() -> Result<()> {
        let all = load_locations(None)?;

        let out = list_locations(&all)?;
        assert!(out.contains("pocitos"));
        assert!(out.contains("-34.9118"));
        Ok(())
    }
}
