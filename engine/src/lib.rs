//! Live tracking of the buses of one line around the user.
//!
//! The core is `TrackingSession`, a synchronous state machine fed with `Event`s and answering
//! with the `Effect`s the outside world has to carry out (acquire a position, fetch vehicles,
//! move the camera, reveal the list panel).  It knows nothing about rendering, networking or
//! time.
//!
//! `SessionActor` wraps it for real use: asynchronous work runs in spawned tasks whose results
//! come back as messages, so that they are serialised with user operations.  `Tracker` is the
//! handle to drive one.
//!

pub use actors::*;
pub use camera::*;
pub use error::*;
pub use location::*;
pub use markers::*;
pub use session::*;
pub use tracker::*;
pub use view::*;

mod actors;
mod camera;
mod error;
mod location;
mod markers;
mod session;
mod tracker;
mod view;

const NAME: &str = env!("CARGO_PKG_NAME");
const EVERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> String {
    format!("{}/{}", NAME, EVERSION)
}
