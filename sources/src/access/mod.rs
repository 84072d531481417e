//! One sub-module per kind of site.
//!

pub use stm::*;

mod stm;
