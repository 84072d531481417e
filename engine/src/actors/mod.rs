//! Actors of the tracking engine.
//!

pub use session::*;

mod session;
