//! Camera and summary panel
//!
//! Selecting a bus in the list moves the camera onto it with an animation that nobody waits
//! for; a new selection simply re-targets it.  A successful query slides the list panel in,
//! a second reveal restarts the slide from wherever the panel is, so a panel already shown
//! stays put.
//!

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use stm_formats::Position;

use crate::{Effect, MapView};

/// Zoom span used when centering on a single point
pub const DEF_SPAN: f64 = 0.02;

/// Duration of the camera move on selection
pub const CAMERA_MOVE: Duration = Duration::from_millis(2000);

/// Duration of the panel slide-in
pub const PANEL_SLIDE: Duration = Duration::from_millis(1000);

/// Panel offset when hidden (its height)
pub const PANEL_HIDDEN: f64 = 220.;

/// Panel offset when fully shown
pub const PANEL_SHOWN: f64 = 1.;

/// Map viewport: center and zoom spans.
///
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CameraRegion {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl CameraRegion {
    /// Region centered on `pos` with the default span.
    ///
    pub fn around(pos: Position) -> Self {
        CameraRegion {
            latitude: pos.latitude,
            longitude: pos.longitude,
            latitude_delta: DEF_SPAN,
            longitude_delta: DEF_SPAN,
        }
    }

    #[inline]
    pub fn center(&self) -> Position {
        Position::new(self.latitude, self.longitude)
    }
}

/// Last camera command issued.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraMove {
    pub region: CameraRegion,
    pub duration: Duration,
    pub issued: Instant,
}

/// Slide-in animation of the summary panel, linear from `from` to `PANEL_SHOWN`.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelSlide {
    started: Option<Instant>,
    /// Offset at the start of the current slide
    from: f64,
    duration: Duration,
}

impl Default for PanelSlide {
    fn default() -> Self {
        PanelSlide {
            started: None,
            from: PANEL_HIDDEN,
            duration: PANEL_SLIDE,
        }
    }
}

impl PanelSlide {
    /// Start (or restart) the slide at `now` from the current offset, which is returned.
    ///
    pub fn reveal(&mut self, now: Instant) -> f64 {
        if self.started.is_some() && !self.is_settled(now) {
            debug!("panel slide restarted");
        }
        self.from = self.offset_at(now);
        self.started = Some(now);
        self.from
    }

    /// Has the panel ever been asked to show?
    ///
    pub fn is_visible(&self) -> bool {
        self.started.is_some()
    }

    /// Animation over (or never started).
    ///
    pub fn is_settled(&self, now: Instant) -> bool {
        match self.started {
            Some(t) => now.saturating_duration_since(t) >= self.duration,
            None => true,
        }
    }

    /// Vertical offset of the panel at `now`.
    ///
    pub fn offset_at(&self, now: Instant) -> f64 {
        match self.started {
            None => PANEL_HIDDEN,
            Some(t) => {
                let elapsed = now.saturating_duration_since(t).as_secs_f64();
                let ratio = (elapsed / self.duration.as_secs_f64()).min(1.);
                self.from + (PANEL_SHOWN - self.from) * ratio
            }
        }
    }
}

/// Turns camera and panel effects into map commands and remembers what was asked last.
///
#[derive(Debug)]
pub struct SelectionCameraSync {
    view: Arc<dyn MapView>,
    panel: PanelSlide,
    camera: Option<CameraMove>,
}

impl SelectionCameraSync {
    pub fn new(view: Arc<dyn MapView>) -> Self {
        SelectionCameraSync {
            view,
            panel: PanelSlide::default(),
            camera: None,
        }
    }

    /// Handle the effects we own, ignore the others.
    ///
    pub fn apply(&mut self, effect: &Effect, now: Instant) {
        match effect {
            Effect::CenterOn(region) => self.center_on(*region),
            Effect::RevealPanel => self.reveal_panel(now),
            Effect::MoveCamera { region, duration } => self.move_camera(*region, *duration, now),
            _ => (),
        }
    }

    /// Initial placement, no animation.
    ///
    #[tracing::instrument(skip(self))]
    pub fn center_on(&mut self, region: CameraRegion) {
        trace!("center_on");
        self.view.set_region(region);
    }

    /// Fire-and-forget animated move.
    ///
    #[tracing::instrument(skip(self, now))]
    pub fn move_camera(&mut self, region: CameraRegion, duration: Duration, now: Instant) {
        if let Some(prev) = self.camera {
            if now.saturating_duration_since(prev.issued) < prev.duration {
                debug!("camera re-targeted to {}", region.center());
            }
        }
        self.camera = Some(CameraMove {
            region,
            duration,
            issued: now,
        });
        self.view.animate_to_region(region, duration);
    }

    #[tracing::instrument(skip(self, now))]
    pub fn reveal_panel(&mut self, now: Instant) {
        let from = self.panel.reveal(now);
        self.view.slide_panel(from, PANEL_SHOWN, self.panel.duration);
    }

    pub fn panel(&self) -> &PanelSlide {
        &self.panel
    }

    pub fn camera(&self) -> Option<CameraMove> {
        self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MapCommand, RecordingView};

    #[test]
    fn test_region_around() {
        let r = CameraRegion::around(Position::new(-34.91, -56.20));

        assert_eq!(-34.91, r.latitude);
        assert_eq!(-56.20, r.longitude);
        assert_eq!(DEF_SPAN, r.latitude_delta);
        assert_eq!(DEF_SPAN, r.longitude_delta);
    }

    #[test]
    fn test_panel_hidden_by_default() {
        let p = PanelSlide::default();
        let now = Instant::now();

        assert!(!p.is_visible());
        assert!(p.is_settled(now));
        assert_eq!(PANEL_HIDDEN, p.offset_at(now));
    }

    #[test]
    fn test_panel_slide_progress() {
        let mut p = PanelSlide::default();
        let t0 = Instant::now();
        p.reveal(t0);

        assert!(p.is_visible());
        assert!(!p.is_settled(t0));
        assert_eq!(PANEL_HIDDEN, p.offset_at(t0));

        let mid = p.offset_at(t0 + PANEL_SLIDE / 2);
        assert!((mid - (PANEL_HIDDEN + PANEL_SHOWN) / 2.).abs() < 1e-6);

        assert!(p.is_settled(t0 + PANEL_SLIDE));
        assert_eq!(PANEL_SHOWN, p.offset_at(t0 + PANEL_SLIDE * 3));
    }

    #[test]
    fn test_panel_reveal_restarts() {
        let mut p = PanelSlide::default();
        let t0 = Instant::now();
        p.reveal(t0);

        let t1 = t0 + Duration::from_millis(600);
        let before = p.offset_at(t1);
        let from = p.reveal(t1);

        assert_eq!(before, from);
        assert_eq!(before, p.offset_at(t1));
        assert!(from < PANEL_HIDDEN && from > PANEL_SHOWN);
        assert!(!p.is_settled(t0 + PANEL_SLIDE));
        assert!(p.is_settled(t1 + PANEL_SLIDE));
        assert_eq!(PANEL_SHOWN, p.offset_at(t1 + PANEL_SLIDE));
    }

    #[test]
    fn test_panel_reveal_when_shown() {
        let view = Arc::new(RecordingView::default());
        let mut sync = SelectionCameraSync::new(view.clone());
        let t0 = Instant::now();

        sync.reveal_panel(t0);
        let t1 = t0 + Duration::from_secs(5);
        assert_eq!(PANEL_SHOWN, sync.panel().offset_at(t1));

        sync.reveal_panel(t1);
        assert_eq!(PANEL_SHOWN, sync.panel().offset_at(t1));
        assert_eq!(PANEL_SHOWN, sync.panel().offset_at(t1 + PANEL_SLIDE / 2));
        assert_eq!(
            vec![
                MapCommand::SlidePanel(PANEL_HIDDEN, PANEL_SHOWN, PANEL_SLIDE),
                MapCommand::SlidePanel(PANEL_SHOWN, PANEL_SHOWN, PANEL_SLIDE)
            ],
            view.commands()
        );
    }

    #[test]
    fn test_sync_retargets_camera() {
        let view = Arc::new(RecordingView::default());
        let mut sync = SelectionCameraSync::new(view.clone());
        let t0 = Instant::now();

        let a = CameraRegion::around(Position::new(-34.91, -56.20));
        let b = CameraRegion::around(Position::new(-34.88, -56.25));
        sync.move_camera(a, CAMERA_MOVE, t0);
        sync.move_camera(b, CAMERA_MOVE, t0 + Duration::from_millis(500));

        assert_eq!(Some(b), sync.camera().map(|c| c.region));
        assert_eq!(
            vec![
                MapCommand::AnimateTo(a, CAMERA_MOVE),
                MapCommand::AnimateTo(b, CAMERA_MOVE)
            ],
            view.commands()
        );
    }

    #[test]
    fn test_sync_apply() {
        let view = Arc::new(RecordingView::default());
        let mut sync = SelectionCameraSync::new(view.clone());
        let now = Instant::now();
        let r = CameraRegion::around(Position::new(-34.9, -56.18));

        sync.apply(&Effect::CenterOn(r), now);
        sync.apply(&Effect::RevealPanel, now);
        sync.apply(&Effect::AcquireLocation, now);

        assert!(sync.panel().is_visible());
        assert!(sync.camera().is_none());
        assert_eq!(
            vec![
                MapCommand::SetRegion(r),
                MapCommand::SlidePanel(PANEL_HIDDEN, PANEL_SHOWN, PANEL_SLIDE)
            ],
            view.commands()
        );
    }
}
