//! What we expect from the map display.
//!
//! Rendering tiles and markers is somebody else's job; all the session does is hand over a
//! camera region, a set of markers and the panel animation.  Every call is fire-and-forget.
//!

use std::fmt::Debug;
use std::sync::Mutex;
use std::time::Duration;

use tracing::{debug, warn};

use crate::{CameraRegion, DisplayMarker};

pub trait MapView: Debug + Send + Sync {
    /// Place the camera without animation
    fn set_region(&self, region: CameraRegion);
    /// Animated camera move
    fn animate_to_region(&self, region: CameraRegion, duration: Duration);
    /// Replace all markers
    fn show_markers(&self, markers: &[DisplayMarker]);
    /// Slide the summary panel between two offsets
    fn slide_panel(&self, from: f64, to: f64, duration: Duration);
}

/// One call made on a `MapView`.
///
#[derive(Clone, Debug, PartialEq)]
pub enum MapCommand {
    SetRegion(CameraRegion),
    AnimateTo(CameraRegion, Duration),
    ShowMarkers(Vec<DisplayMarker>),
    SlidePanel(f64, f64, Duration),
}

/// A map that only writes down what it has been told.  Used headless and in tests.
///
#[derive(Debug, Default)]
pub struct RecordingView {
    commands: Mutex<Vec<MapCommand>>,
}

impl RecordingView {
    fn push(&self, cmd: MapCommand) {
        debug!("map: {cmd:?}");
        match self.commands.lock() {
            Ok(mut list) => list.push(cmd),
            Err(e) => warn!("map command lost: {e}"),
        }
    }

    /// Everything so far, in order.
    ///
    pub fn commands(&self) -> Vec<MapCommand> {
        self.commands
            .lock()
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    /// Current markers, i.e. the last set shown.
    ///
    pub fn markers(&self) -> Vec<DisplayMarker> {
        self.commands()
            .into_iter()
            .rev()
            .find_map(|c| match c {
                MapCommand::ShowMarkers(m) => Some(m),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Where the camera was last sent, animated or not.
    ///
    pub fn region(&self) -> Option<CameraRegion> {
        self.commands().into_iter().rev().find_map(|c| match c {
            MapCommand::SetRegion(r) | MapCommand::AnimateTo(r, _) => Some(r),
            _ => None,
        })
    }
}

impl MapView for RecordingView {
    fn set_region(&self, region: CameraRegion) {
        self.push(MapCommand::SetRegion(region));
    }

    fn animate_to_region(&self, region: CameraRegion, duration: Duration) {
        self.push(MapCommand::AnimateTo(region, duration));
    }

    fn show_markers(&self, markers: &[DisplayMarker]) {
        self.push(MapCommand::ShowMarkers(markers.to_vec()));
    }

    fn slide_panel(&self, from: f64, to: f64, duration: Duration) {
        self.push(MapCommand::SlidePanel(from, to, duration));
    }
}
