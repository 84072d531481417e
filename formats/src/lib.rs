//! Definition of the data formats
//!
//! The STM online service answers with a GeoJSON-like feature collection; this crate turns it
//! into `VehicleRecord`s, the only record type the rest of the tracker knows about.
//!
//! The service gives coordinates as `[longitude, latitude]`: every conversion goes through
//! `lonlat_to_position()`.
//!

// Re-export for convenience
//
pub use error::*;
pub use format::*;
pub use position::*;
pub use stm::*;
pub use vehicle::*;

mod error;
mod format;
mod position;
mod stm;
mod vehicle;
