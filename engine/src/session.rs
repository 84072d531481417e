//! The tracking session itself.
//!
//! `TrackingSession` owns the `SessionContext` and is the only one to modify it.  Everything
//! goes through `handle()` (or the named operations which are the same thing): user operations
//! and asynchronous completions alike are `Event`s, and the answer is a list of `Effect`s for
//! the caller to carry out.  Nothing in here waits, sleeps or does I/O.
//!
//! Rules:
//! - one location acquisition at a time, and only before we have a position
//! - one query in flight at a time, a second submit is dropped
//! - a failed query puts back whatever was there before
//! - completions nobody is waiting for are ignored
//!

use std::mem;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use stm_formats::{Position, VehicleRecord};
use stm_sources::QueryError;

use crate::{CameraRegion, LocationError, SessionError, CAMERA_MOVE};

/// Where the screen is at.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize, strum::Display)]
pub enum ViewState {
    /// Waiting for a position
    #[default]
    Initializing,
    /// Position known, nothing asked yet
    Idle,
    /// Request in flight, `previous` is what gets restored on failure
    Querying {
        previous: Option<Vec<VehicleRecord>>,
    },
    /// Results of the last successful query
    Ready(Vec<VehicleRecord>),
}

/// Everything the screen shows.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionContext {
    pub user_position: Option<Position>,
    pub line_query: String,
    pub view_state: ViewState,
    /// Refers to `visible_results()`, so it stays set while a query runs over a previous set
    pub selected_vehicle_id: Option<String>,
    /// Last failure, cleared by the next success of the same kind
    pub last_error: Option<SessionError>,
}

impl SessionContext {
    /// Results currently on screen.  While a query runs, this is still the previous set.
    ///
    pub fn visible_results(&self) -> &[VehicleRecord] {
        match &self.view_state {
            ViewState::Ready(r) => r,
            ViewState::Querying { previous: Some(r) } => r,
            _ => &[],
        }
    }

    /// The selected vehicle, if any.
    ///
    pub fn selected(&self) -> Option<&VehicleRecord> {
        let id = self.selected_vehicle_id.as_deref()?;
        self.visible_results().iter().find(|v| v.id == id)
    }
}

/// Input of the session.
///
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Start,
    RetryLocation,
    LocationResolved(Result<Position, LocationError>),
    SetLineQuery(String),
    SubmitQuery,
    QueryResolved(Result<Vec<VehicleRecord>, QueryError>),
    SelectVehicle(String),
}

/// Output of the session, to be carried out by the caller.
///
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Run the location provider and report with `Event::LocationResolved`
    AcquireLocation,
    /// Initial camera placement
    CenterOn(CameraRegion),
    /// Run the query and report with `Event::QueryResolved`
    Fetch { operator: String, lines: Vec<String> },
    /// Slide the summary panel in
    RevealPanel,
    /// Animated camera move, not awaited
    MoveCamera {
        region: CameraRegion,
        duration: Duration,
    },
}

#[derive(Clone, Debug)]
pub struct TrackingSession {
    ctx: SessionContext,
    /// Operator id sent with every query
    operator: String,
    /// A location request is pending
    acquiring: bool,
    /// `start()` has been called once
    started: bool,
}

impl TrackingSession {
    #[tracing::instrument]
    pub fn new(operator: &str) -> Self {
        trace!("session::new");
        TrackingSession {
            ctx: SessionContext::default(),
            operator: operator.to_string(),
            acquiring: false,
            started: false,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn state(&self) -> &ViewState {
        &self.ctx.view_state
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn is_acquiring(&self) -> bool {
        self.acquiring
    }

    /// Single entry point.
    ///
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Start => self.start(),
            Event::RetryLocation => self.retry_location(),
            Event::LocationResolved(res) => self.location_resolved(res),
            Event::SetLineQuery(text) => self.set_line_query(&text),
            Event::SubmitQuery => self.submit_query(),
            Event::QueryResolved(res) => self.query_resolved(res),
            Event::SelectVehicle(id) => self.select_vehicle(&id),
        }
    }

    /// Ask for our position, once.
    ///
    #[tracing::instrument(skip(self))]
    pub fn start(&mut self) -> Vec<Effect> {
        if self.started {
            debug!("already started");
            return vec![];
        }
        self.started = true;
        self.acquire()
    }

    /// Ask again after a failed acquisition.  The failure is forgotten while we try.
    ///
    #[tracing::instrument(skip(self))]
    pub fn retry_location(&mut self) -> Vec<Effect> {
        let failed = self
            .ctx
            .last_error
            .as_ref()
            .map(|e| e.is_location())
            .unwrap_or(false);
        if !self.started || !failed {
            debug!("nothing to retry");
            return vec![];
        }
        let fx = self.acquire();
        if !fx.is_empty() {
            self.ctx.last_error = None;
        }
        fx
    }

    fn acquire(&mut self) -> Vec<Effect> {
        if self.acquiring || self.ctx.view_state != ViewState::Initializing {
            return vec![];
        }
        self.acquiring = true;
        vec![Effect::AcquireLocation]
    }

    #[tracing::instrument(skip(self))]
    pub fn location_resolved(&mut self, res: Result<Position, LocationError>) -> Vec<Effect> {
        if !self.acquiring {
            warn!("unexpected location result, ignored");
            return vec![];
        }
        self.acquiring = false;

        match res {
            Ok(pos) => {
                info!("user at {pos}");
                self.ctx.user_position = Some(pos);
                self.ctx.view_state = ViewState::Idle;
                self.ctx.last_error = None;
                vec![Effect::CenterOn(CameraRegion::around(pos))]
            }
            Err(e) => {
                warn!("no position: {e}");
                self.ctx.last_error = Some(e.into());
                vec![]
            }
        }
    }

    /// No validation, an empty line is a legal query.
    ///
    #[tracing::instrument(skip(self))]
    pub fn set_line_query(&mut self, text: &str) -> Vec<Effect> {
        self.ctx.line_query = text.to_string();
        vec![]
    }

    #[tracing::instrument(skip(self))]
    pub fn submit_query(&mut self) -> Vec<Effect> {
        let previous = match &mut self.ctx.view_state {
            ViewState::Idle => None,
            ViewState::Ready(results) => Some(mem::take(results)),
            state => {
                debug!("submit ignored while {state}");
                return vec![];
            }
        };
        self.ctx.view_state = ViewState::Querying { previous };

        debug!("querying line '{}'", self.ctx.line_query);
        vec![Effect::Fetch {
            operator: self.operator.clone(),
            lines: vec![self.ctx.line_query.clone()],
        }]
    }

    #[tracing::instrument(skip(self, res))]
    pub fn query_resolved(
        &mut self,
        res: Result<Vec<VehicleRecord>, QueryError>,
    ) -> Vec<Effect> {
        let previous = match &mut self.ctx.view_state {
            ViewState::Querying { previous } => previous.take(),
            _ => {
                warn!("unexpected query result, ignored");
                return vec![];
            }
        };

        match res {
            Ok(results) => {
                info!("{} vehicle(s) for line '{}'", results.len(), self.ctx.line_query);

                // Selection only survives if the vehicle is still there.
                if let Some(id) = &self.ctx.selected_vehicle_id {
                    if !results.iter().any(|v| &v.id == id) {
                        debug!("selected {id} is gone");
                        self.ctx.selected_vehicle_id = None;
                    }
                }
                self.ctx.view_state = ViewState::Ready(results);
                self.ctx.last_error = None;
                vec![Effect::RevealPanel]
            }
            Err(e) => {
                warn!("query failed: {e}");
                self.ctx.view_state = match previous {
                    Some(results) => ViewState::Ready(results),
                    None => ViewState::Idle,
                };
                self.ctx.last_error = Some(e.into());
                vec![]
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn select_vehicle(&mut self, id: &str) -> Vec<Effect> {
        let ViewState::Ready(results) = &self.ctx.view_state else {
            debug!("not ready, selection ignored");
            return vec![];
        };
        let Some(v) = results.iter().find(|v| v.id == id) else {
            debug!("unknown vehicle {id}");
            return vec![];
        };

        let region = CameraRegion::around(v.position);
        self.ctx.selected_vehicle_id = Some(id.to_string());
        vec![Effect::MoveCamera {
            region,
            duration: CAMERA_MOVE,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const HOME: Position = Position {
        latitude: -34.90,
        longitude: -56.18,
    };

    fn bus(id: &str, lat: f64, lon: f64) -> VehicleRecord {
        VehicleRecord {
            id: id.to_string(),
            position: Position::new(lat, lon),
            line_label: "405".to_string(),
            destination_label: "PEÑAROL".to_string(),
            sub_line_label: String::new(),
        }
    }

    fn idle() -> TrackingSession {
        let mut s = TrackingSession::new("50");
        s.start();
        s.location_resolved(Ok(HOME));
        s
    }

    fn ready(results: Vec<VehicleRecord>) -> TrackingSession {
        let mut s = idle();
        s.set_line_query("405");
        s.submit_query();
        s.query_resolved(Ok(results));
        s
    }

    #[test]
    fn test_start_acquires_once() {
        let mut s = TrackingSession::new("50");

        assert_eq!(vec![Effect::AcquireLocation], s.handle(Event::Start));
        assert!(s.is_acquiring());
        assert!(s.handle(Event::Start).is_empty());
        assert_eq!(&ViewState::Initializing, s.state());
    }

    #[test]
    fn test_location_ok() {
        let mut s = TrackingSession::new("50");
        s.start();

        let fx = s.handle(Event::LocationResolved(Ok(HOME)));
        assert_eq!(vec![Effect::CenterOn(CameraRegion::around(HOME))], fx);
        assert_eq!(&ViewState::Idle, s.state());
        assert_eq!(Some(HOME), s.context().user_position);
        assert!(!s.is_acquiring());
    }

    #[rstest]
    #[case(LocationError::PermissionDenied, SessionError::PermissionDenied)]
    #[case(
        LocationError::Unavailable("gps".to_string()),
        SessionError::LocationUnavailable("gps".to_string())
    )]
    fn test_location_failure(#[case] err: LocationError, #[case] want: SessionError) {
        let mut s = TrackingSession::new("50");
        s.start();

        assert!(s.location_resolved(Err(err)).is_empty());
        assert_eq!(&ViewState::Initializing, s.state());
        assert_eq!(Some(want), s.context().last_error);
        assert!(s.context().user_position.is_none());

        // Queries are meaningless without a position
        assert!(s.submit_query().is_empty());
        assert_eq!(&ViewState::Initializing, s.state());
    }

    #[test]
    fn test_retry_location() {
        let mut s = TrackingSession::new("50");

        // Nothing to retry before start
        assert!(s.retry_location().is_empty());

        s.start();
        // Nor while the first attempt runs
        assert!(s.retry_location().is_empty());

        s.location_resolved(Err(LocationError::PermissionDenied));
        assert_eq!(vec![Effect::AcquireLocation], s.retry_location());
        assert!(s.context().last_error.is_none());
        assert!(s.retry_location().is_empty());

        s.location_resolved(Ok(HOME));
        assert_eq!(&ViewState::Idle, s.state());
        assert!(s.context().last_error.is_none());

        // Position known, no more retries
        assert!(s.retry_location().is_empty());
    }

    #[test]
    fn test_stale_location_ignored() {
        let mut s = idle();
        let before = s.context().clone();

        assert!(s
            .location_resolved(Ok(Position::new(0., 0.)))
            .is_empty());
        assert_eq!(&before, s.context());
    }

    #[test]
    fn test_set_line_query() {
        let mut s = TrackingSession::new("50");

        assert!(s.handle(Event::SetLineQuery("405".to_string())).is_empty());
        assert_eq!("405", s.context().line_query);
        s.set_line_query("");
        assert_eq!("", s.context().line_query);
    }

    #[test]
    fn test_submit_query() {
        let mut s = idle();
        s.set_line_query("405");

        let fx = s.submit_query();
        assert_eq!(
            vec![Effect::Fetch {
                operator: "50".to_string(),
                lines: vec!["405".to_string()]
            }],
            fx
        );
        assert_eq!(&ViewState::Querying { previous: None }, s.state());
    }

    #[test]
    fn test_submit_empty_line() {
        let mut s = idle();

        let fx = s.submit_query();
        assert_eq!(
            vec![Effect::Fetch {
                operator: "50".to_string(),
                lines: vec![String::new()]
            }],
            fx
        );
        s.query_resolved(Ok(vec![]));
        assert_eq!(&ViewState::Ready(vec![]), s.state());
    }

    #[test]
    fn test_submit_while_querying_is_noop() {
        let mut s = idle();
        s.set_line_query("405");
        s.submit_query();
        let before = s.context().clone();

        assert!(s.handle(Event::SubmitQuery).is_empty());
        assert_eq!(&before, s.context());
    }

    #[test]
    fn test_query_success_reveals_panel() {
        let mut s = idle();
        s.submit_query();

        let fx = s.query_resolved(Ok(vec![bus("bus1", -34.91, -56.20)]));
        assert_eq!(vec![Effect::RevealPanel], fx);
        assert_eq!(1, s.context().visible_results().len());
    }

    #[test]
    fn test_query_failure_back_to_idle() {
        let mut s = idle();
        s.submit_query();

        let fx = s.query_resolved(Err(QueryError::NetworkError("boom".to_string())));
        assert!(fx.is_empty());
        assert_eq!(&ViewState::Idle, s.state());
        assert_eq!(
            Some(SessionError::NetworkError("boom".to_string())),
            s.context().last_error
        );

        // Not blocked by the failure
        assert_eq!(1, s.submit_query().len());
        assert!(matches!(s.state(), ViewState::Querying { .. }));
    }

    #[test]
    fn test_query_failure_restores_results() {
        let results = vec![bus("bus1", -34.91, -56.20), bus("bus2", -34.92, -56.21)];
        let mut s = ready(results.clone());

        s.submit_query();
        // Still visible while the request runs
        assert_eq!(results.as_slice(), s.context().visible_results());

        s.query_resolved(Err(QueryError::MalformedResponse("junk".to_string())));
        assert_eq!(&ViewState::Ready(results), s.state());
        assert!(matches!(
            s.context().last_error,
            Some(SessionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_requery_replaces_results() {
        let mut s = ready(vec![bus("bus1", -34.91, -56.20)]);

        s.submit_query();
        s.query_resolved(Ok(vec![bus("bus7", -34.80, -56.10)]));
        assert_eq!(
            &ViewState::Ready(vec![bus("bus7", -34.80, -56.10)]),
            s.state()
        );
    }

    #[test]
    fn test_stale_query_result_ignored() {
        let mut s = idle();
        let before = s.context().clone();

        assert!(s.query_resolved(Ok(vec![bus("x", 0., 0.)])).is_empty());
        assert_eq!(&before, s.context());
    }

    #[test]
    fn test_select_vehicle() {
        let mut s = ready(vec![bus("bus1", -34.91, -56.20)]);

        let fx = s.handle(Event::SelectVehicle("bus1".to_string()));
        assert_eq!(
            vec![Effect::MoveCamera {
                region: CameraRegion::around(Position::new(-34.91, -56.20)),
                duration: CAMERA_MOVE,
            }],
            fx
        );
        assert_eq!(Some("bus1".to_string()), s.context().selected_vehicle_id);
        assert_eq!(Some("bus1"), s.context().selected().map(|v| v.id.as_str()));
    }

    #[test]
    fn test_select_unknown_is_noop() {
        let mut s = ready(vec![bus("bus1", -34.91, -56.20)]);
        s.select_vehicle("bus1");

        assert!(s.select_vehicle("nope").is_empty());
        assert_eq!(Some("bus1".to_string()), s.context().selected_vehicle_id);
    }

    #[test]
    fn test_select_not_ready_is_noop() {
        let mut s = idle();
        assert!(s.select_vehicle("bus1").is_empty());

        let mut s = ready(vec![bus("bus1", -34.91, -56.20)]);
        s.submit_query();
        assert!(s.select_vehicle("bus1").is_empty());
        assert!(s.context().selected_vehicle_id.is_none());
    }

    #[test]
    fn test_selection_across_queries() {
        let mut s = ready(vec![bus("bus1", -34.91, -56.20), bus("bus2", -34.92, -56.21)]);
        s.select_vehicle("bus2");

        s.submit_query();
        s.query_resolved(Ok(vec![bus("bus2", -34.93, -56.22)]));
        assert_eq!(Some("bus2".to_string()), s.context().selected_vehicle_id);

        s.submit_query();
        s.query_resolved(Ok(vec![bus("bus1", -34.93, -56.22)]));
        assert!(s.context().selected_vehicle_id.is_none());
    }

    #[test]
    fn test_selection_kept_while_querying() {
        let mut s = ready(vec![bus("bus1", -34.91, -56.20), bus("bus2", -34.92, -56.21)]);
        s.select_vehicle("bus2");

        s.submit_query();
        assert!(matches!(s.state(), ViewState::Querying { previous: Some(_) }));
        assert_eq!(Some("bus2"), s.context().selected().map(|v| v.id.as_str()));

        s.query_resolved(Err(QueryError::NetworkError("down".to_string())));
        assert!(matches!(s.state(), ViewState::Ready(_)));
        assert_eq!(Some("bus2"), s.context().selected().map(|v| v.id.as_str()));
    }

    #[test]
    fn test_ready_implies_position() {
        let s = ready(vec![bus("bus1", -34.91, -56.20)]);

        assert!(matches!(s.state(), ViewState::Ready(_)));
        assert!(s.context().user_position.is_some());
    }

    #[test]
    fn test_end_to_end() {
        let mut s = TrackingSession::new("50");

        assert_eq!(vec![Effect::AcquireLocation], s.handle(Event::Start));
        s.handle(Event::LocationResolved(Ok(HOME)));
        assert_eq!(&ViewState::Idle, s.state());

        s.handle(Event::SetLineQuery("405".to_string()));
        s.handle(Event::SubmitQuery);

        let data = r#"{"type":"FeatureCollection","features":[{"properties":{"id":"bus1","linea":"405","destinoDesc":"PEÑAROL","sublinea":""},"geometry":{"type":"Point","coordinates":[-56.20,-34.91]}}]}"#;
        let results = stm_formats::decode_vehicles(data).unwrap();
        s.handle(Event::QueryResolved(Ok(results)));

        let ViewState::Ready(results) = s.state().clone() else {
            panic!("not ready");
        };
        assert_eq!(1, results.len());
        assert_eq!("bus1", results[0].id);
        assert_eq!(Position::new(-34.91, -56.20), results[0].position);

        let markers = crate::reconcile(s.context().user_position, &results);
        assert_eq!(2, markers.len());

        let fx = s.handle(Event::SelectVehicle("bus1".to_string()));
        let Some(Effect::MoveCamera { region, .. }) = fx.first() else {
            panic!("no camera move");
        };
        assert_eq!(Position::new(-34.91, -56.20), region.center());
    }
}
