//! Module describing all possible commands and sub-commands to the `stmctl` main driver
//!
//! We have one main command:
//!
//! - `track`
//!
//! `track` runs a complete session: get a position, query a line, print the buses found and,
//! if asked, select one and print where the camera went.
//!
//! `list` shows the configured sources, formats and named locations, `completion` is here just
//! to configure the various shells completion system.
//!

use std::path::PathBuf;

use clap::{crate_authors, crate_description, crate_name, crate_version, Parser, ValueEnum};
use clap_complete::shells::Shell;

/// CLI options
#[derive(Parser)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Alternate sources file.
    #[clap(short = 'S', long)]
    pub sources: Option<PathBuf>,
    /// Hierarchical log output.
    #[clap(short = 'T', long)]
    pub tree: bool,
    /// Also log into hourly files in this directory.
    #[clap(long)]
    pub log_dir: Option<PathBuf>,
    /// Sub-commands (see below).
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

// ------

/// All sub-commands:
///
/// `completion SHELL`
/// `list (formats|locations|sources)`
/// `track [-l LINE] [--at LAT,LON | -L NAME] [-s ID]`
/// `version`
///
#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Generate Completion stuff
    Completion(ComplOpts),
    /// List formats, locations or sources
    List(ListOpts),
    /// Track the buses of a line
    Track(TrackOpts),
    /// List all module versions
    Version,
}

// ------

/// Options for a tracking session.
///
#[derive(Debug, Default, Parser)]
pub struct TrackOpts {
    /// Line to query, default from the configuration or empty.
    #[clap(short = 'l', long)]
    pub line: Option<String>,
    /// Position as LAT,LON.
    #[clap(long, allow_hyphen_values = true, conflicts_with = "location")]
    pub at: Option<String>,
    /// Named location.
    #[clap(short = 'L', long)]
    pub location: Option<String>,
    /// Select this vehicle after the query.
    #[clap(short = 's', long)]
    pub select: Option<String>,
    /// Site to use instead of the configured one.
    #[clap(long)]
    pub site: Option<String>,
    /// Give up waiting after that many seconds.
    #[clap(short = 't', long, default_value = "30")]
    pub timeout: u64,
}

// ------

/// Options to generate completion files at runtime
///
#[derive(Debug, Parser)]
pub struct ComplOpts {
    #[clap(value_parser)]
    pub shell: Shell,
}

// ------

/// All `list` sub-commands:
///
/// `list formats`
/// `list locations`
/// `list sources`
///
#[derive(Debug, Parser)]
pub struct ListOpts {
    #[clap(value_parser)]
    pub cmd: ListSubCommand,
}

/// These are the sub-commands for `list`
///
#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, ValueEnum)]
pub enum ListSubCommand {
    /// List all formats
    Formats,
    /// List all named locations
    Locations,
    /// List all sources from `sources.hcl`
    Sources,
}
