//! Montevideo STM online site specifics
//!
//! Phases:
//! 1. POST `{"empresa": ..., "lineas": [...]}` as JSON to the `get` route
//! 2. the answer is a GeoJSON feature collection, decoded in `stm-formats`
//!
//! No authentication is needed.  We rely on the default timeouts of the HTTP client.
//!
//! This implement the `VehicleQueryService` trait described in `lib.rs`.
//!

use async_trait::async_trait;
use clap::{crate_name, crate_version};
use reqwest::Client;
use tracing::{debug, trace, warn};

use stm_formats::{decode_vehicles, Format, StmRequest, VehicleRecord};

use crate::{AccessError, QueryError, Site, VehicleQueryService};

/// Default operator: CUTCSA
pub const DEF_OPERATOR: &str = "50";

/// Default endpoint
pub const DEF_BASE_URL: &str = "http://montevideo.gub.uy";

/// Default data route
pub const DEF_GET: &str = "/buses/rest/stm-online";

/// StmOnline represent what is needed to fetch data from the STM online service.
///
#[derive(Clone, Debug)]
pub struct StmOnline {
    /// Name of the site
    pub site: String,
    /// Input format
    pub format: Format,
    /// Operator identifier
    pub operator: String,
    /// Base site url taken from config
    pub base_url: String,
    /// Add this to `base_url` to fetch data
    pub get: String,
    /// reqwest client
    pub client: Client,
}

impl StmOnline {
    #[tracing::instrument]
    pub fn new() -> Self {
        trace!("stm::new");
        StmOnline::default()
    }

    /// Load our site details from what is in the configuration file
    ///
    #[tracing::instrument(skip(self))]
    pub fn load(&mut self, site: &Site) -> Result<&mut Self, AccessError> {
        trace!("stm::load({})", site.name);

        if site.format() != Format::StmOnline {
            return Err(AccessError::InvalidSite(site.name.clone()));
        }
        if site.operator.is_empty() {
            return Err(AccessError::BadParam(format!("{}: empty operator", site.name)));
        }

        self.site = site.name.clone();
        self.format = site.format();
        self.operator = site.operator.clone();
        self.base_url = site.base_url.to_owned();
        self.get = site
            .route("get")
            .ok_or_else(|| AccessError::MissingRoute(site.name.clone(), "get".to_string()))?
            .to_owned();
        Ok(self)
    }
}

impl Default for StmOnline {
    fn default() -> Self {
        StmOnline {
            site: "stm".to_string(),
            format: Format::StmOnline,
            operator: DEF_OPERATOR.to_string(),
            base_url: DEF_BASE_URL.to_string(),
            get: DEF_GET.to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl VehicleQueryService for StmOnline {
    fn name(&self) -> String {
        self.site.to_string()
    }

    fn operator(&self) -> String {
        self.operator.clone()
    }

    /// Fetch the positions of every bus of `operator` running on `lines`.
    ///
    #[tracing::instrument(skip(self))]
    async fn fetch(
        &self,
        operator: &str,
        lines: &[String],
    ) -> Result<Vec<VehicleRecord>, QueryError> {
        let url = format!("{}{}", self.base_url, self.get);
        let data = StmRequest::new(operator, lines);
        trace!("Fetching data through {}…", url);

        let resp = http_post!(self, url, &data)
            .await
            .map_err(|e| QueryError::NetworkError(e.to_string()))?;

        debug!("raw resp={:?}", &resp);

        // Check status
        //
        let code = resp.status();
        if !code.is_success() {
            warn!("stm answered {}", code);
            return Err(QueryError::NetworkError(format!("HTTP {code}")));
        }

        let resp = resp
            .text()
            .await
            .map_err(|e| QueryError::NetworkError(e.to_string()))?;
        debug!("{} bytes read.", resp.len());

        decode_vehicles(&resp).map_err(|e| QueryError::MalformedResponse(e.to_string()))
    }

    /// Return the site's input format
    ///
    fn format(&self) -> Format {
        self.format
    }
}
