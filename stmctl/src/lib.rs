//! Library part of the `stmctl` utility.
//!
//! `stmctl` runs a tracking session without a screen: the position comes from the command line
//! or a named location, the map is a `RecordingView` and what would be on screen is printed as
//! tables.
//!

pub use cli::*;
pub use cmds::*;
pub use config::*;
pub use error::*;

mod cli;
mod cmds;
mod config;
mod error;
