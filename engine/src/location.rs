//! Acquire the user's position, once, when the session starts.
//!
//! The platform side (permission dialog, GPS) is behind the `Geolocation` trait.  The
//! provider asks for permission, then prefers the last known position if the platform has
//! one and only asks for a fresh fix otherwise.
//!

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use stm_common::Location;
use stm_formats::Position;

use crate::LocationError;

/// Platform location API.
///
#[async_trait]
pub trait Geolocation: Debug + Send + Sync {
    /// Ask for foreground location permission, `true` if granted
    async fn request_permission(&self) -> bool;
    /// Cached position, if the device has one
    async fn last_known(&self) -> Option<Position>;
    /// Fresh position fix
    async fn current(&self) -> Result<Position, LocationError>;
}

/// Best-effort current position.
///
#[derive(Clone, Debug)]
pub struct LocationProvider {
    platform: Arc<dyn Geolocation>,
}

impl LocationProvider {
    pub fn new(platform: Arc<dyn Geolocation>) -> Self {
        LocationProvider { platform }
    }

    /// Permission first, then cached position, then a fresh fix.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn acquire(&self) -> Result<Position, LocationError> {
        trace!("location::acquire");

        if !self.platform.request_permission().await {
            warn!("location permission denied");
            return Err(LocationError::PermissionDenied);
        }

        if let Some(pos) = self.platform.last_known().await {
            debug!("using last known position {pos}");
            return Ok(pos);
        }

        let pos = self.platform.current().await?;
        debug!("fresh position {pos}");
        Ok(pos)
    }
}

/// Headless platform: the position is whatever we were told at creation time.
///
/// Without a position, permission is denied, mimicking a user who said no.
///
#[derive(Clone, Debug, Default)]
pub struct StaticGeolocation {
    position: Option<Position>,
}

impl StaticGeolocation {
    pub fn granted(position: Position) -> Self {
        StaticGeolocation {
            position: Some(position),
        }
    }

    pub fn denied() -> Self {
        StaticGeolocation { position: None }
    }
}

impl From<Location> for StaticGeolocation {
    fn from(value: Location) -> Self {
        StaticGeolocation::granted(Position::new(value.lat, value.lon))
    }
}

#[async_trait]
impl Geolocation for StaticGeolocation {
    async fn request_permission(&self) -> bool {
        self.position.is_some()
    }

    async fn last_known(&self) -> Option<Position> {
        self.position
    }

    async fn current(&self) -> Result<Position, LocationError> {
        self.position
            .ok_or_else(|| LocationError::Unavailable("no position configured".to_string()))
    }
}
