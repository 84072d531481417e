//! This is the exposed part of the `stm-sources` configuration API.
//!
//! The list of sites comes from `sources.hcl`, either a file given by the user or the copy
//! embedded at build time.
//!

use std::collections::btree_map::{Iter, Keys, Values};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use eyre::Result;
use serde::Deserialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::trace;

use stm_common::{ConfigFile, Versioned};
use stm_formats::Format;
use stm_macros::add_version;

use crate::{AccessError, Site, StmOnline, VehicleQueryService};

/// On-disk view of `sources.hcl`.
///
#[add_version(1)]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SourcesConfig {
    site: BTreeMap<String, Site>,
}

/// All configured sites, indexed by name.
///
#[derive(Clone, Debug, Default)]
pub struct Sources {
    site: BTreeMap<String, Site>,
}

impl Sources {
    /// Load the sites from `fname` or from the embedded `sources.hcl`.
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&Path>) -> Result<Self> {
        let cfg = match fname {
            Some(fname) => ConfigFile::<SourcesConfig>::load(Some(fname))?,
            None => ConfigFile::<SourcesConfig>::from_hcl(include_str!("sources.hcl"))?,
        };

        let all = cfg
            .into_inner()
            .site
            .into_iter()
            .map(|(n, mut site)| {
                site.name = n.clone();
                (n, site)
            })
            .collect::<BTreeMap<_, _>>();
        trace!("{} sites", all.len());
        Ok(Sources { site: all })
    }

    /// Build the query service for the named site.
    ///
    #[tracing::instrument(skip(self))]
    pub fn as_service(&self, name: &str) -> Result<Arc<dyn VehicleQueryService>, AccessError> {
        match self.site.get(name) {
            Some(site) => {
                trace!("site={}", site);

                match site.format() {
                    Format::StmOnline => {
                        let s = StmOnline::new().load(site)?.clone();
                        Ok(Arc::new(s))
                    }
                    Format::None => Err(AccessError::InvalidSite(name.to_string())),
                }
            }
            None => Err(AccessError::UnknownSite(name.to_string())),
        }
    }

    /// List all sites as a table
    ///
    #[tracing::instrument(skip(self))]
    pub fn list(&self) -> Result<String> {
        let header = vec!["Name", "Format", "Operator", "URL"];

        let mut builder = Builder::default();
        builder.push_record(header);

        self.site.iter().for_each(|(name, site)| {
            let url = match site.route("get") {
                Some(get) => format!("{}{}", site.base_url, get),
                None => site.base_url.clone(),
            };
            builder.push_record(vec![
                name.clone(),
                site.format.clone(),
                site.operator.clone(),
                url,
            ]);
        });

        let allf = builder.build().with(Style::modern()).to_string();
        Ok(format!("List all sources:\n{allf}"))
    }

    /// Wrap `get()`
    ///
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Site> {
        self.site.get(name)
    }

    /// Wrap `len()`
    ///
    #[inline]
    pub fn len(&self) -> usize {
        self.site.len()
    }

    /// Wrap `is_empty()`
    ///
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.site.is_empty()
    }

    /// Wrap `keys()`
    ///
    #[inline]
    pub fn keys(&self) -> Keys<'_, String, Site> {
        self.site.keys()
    }

    /// Wrap `values()`
    ///
    #[inline]
    pub fn values(&self) -> Values<'_, String, Site> {
        self.site.values()
    }

    /// Wrap `iter()`
    ///
    #[inline]
    pub fn iter(&self) -> Iter<'_, String, Site> {
        self.site.iter()
    }
}

impl From<BTreeMap<String, Site>> for Sources {
    fn from(value: BTreeMap<String, Site>) -> Self {
        Sources { site: value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_default() -> Result<()> {
        let s = Sources::load(None)?;

        assert_eq!(1, s.len());
        let stm = s.get("stm").unwrap();
        assert_eq!("stm", stm.name);
        assert_eq!("50", stm.operator);
        assert_eq!(Format::StmOnline, stm.format());
        assert_eq!(Some(&"/buses/rest/stm-online".to_string()), stm.route("get"));
        Ok(())
    }

    #[test]
    fn test_sources_as_service() -> Result<()> {
        let s = Sources::load(None)?;

        let svc = s.as_service("stm")?;
        assert_eq!("stm", svc.name());
        assert_eq!("50", svc.operator());
        assert_eq!(Format::StmOnline, svc.format());
        Ok(())
    }

    #[test]
    fn test_sources_unknown() -> Result<()> {
        let s = Sources::load(None)?;

        let svc = s.as_service("tfl");
        assert!(matches!(svc, Err(AccessError::UnknownSite(_))));
        Ok(())
    }

    #[test]
    fn test_sources_invalid_format() {
        let mut site = Site::new();
        site.format = "teletype".to_string();
        let s = Sources::from(BTreeMap::from([("old".to_string(), site)]));

        assert!(matches!(s.as_service("old"), Err(AccessError::InvalidSite(_))));
    }

    #[test]
    fn test_sources_list() -> Result<()> {
        let s = Sources::load(None)?;

        let out = s.list()?;
        assert!(out.contains("http://montevideo.gub.uy/buses/rest/stm-online"));
        Ok(())
    }
}
