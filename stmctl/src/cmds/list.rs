//! This is the module handling the `list` sub-command.
//!

use eyre::Result;
use tracing::{info, trace};

use stm_common::list_locations;
use stm_formats::Format;
use stm_sources::Sources;

use crate::{Config, ListSubCommand};

/// Return the table for `what`.
///
#[tracing::instrument(skip(cfg, sources))]
pub fn list_things(cfg: &Config, sources: &Sources, what: ListSubCommand) -> Result<String> {
    trace!("list_things");

    match what {
        ListSubCommand::Formats => {
            info!("Listing all formats:");
            Ok(Format::list())
        }
        ListSubCommand::Locations => {
            info!("Listing all locations:");
            list_locations(&cfg.locations()?)
        }
        ListSubCommand::Sources => {
            info!("Listing all sources:");
            sources.list()
        }
    }
}
