//! Session actor
//!
//! Owns a `TrackingSession` and runs its effects:
//! - location acquisition and vehicle fetches are spawned, their result comes back as a message
//! - camera and panel effects go to the map view
//! - markers are reconciled and pushed to the map view whenever they change
//!
//! Every new context is published on a `watch` channel.
//!

use std::sync::Arc;
use std::time::Instant;

use ractor::{cast, Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use stm_formats::{Position, VehicleRecord};
use stm_sources::{QueryError, VehicleQueryService};

use crate::{
    reconcile, DisplayMarker, Effect, Event, LocationError, LocationProvider, MapView,
    SelectionCameraSync, SessionContext, TrackingSession,
};

/// The actor itself.
///
pub struct SessionActor;

#[derive(Debug)]
pub enum SessionMsg {
    /// Operations
    Start,
    RetryLocation,
    SetLineQuery(String),
    SubmitQuery,
    SelectVehicle(String),
    /// Completions
    LocationDone(Result<Position, LocationError>),
    QueryDone(Result<Vec<VehicleRecord>, QueryError>),
    /// RPC
    Snapshot(RpcReplyPort<SessionContext>),
    Markers(RpcReplyPort<Vec<DisplayMarker>>),
}

impl SessionMsg {
    /// Session event carried by this message, RPCs have none.
    ///
    fn into_event(self) -> Option<Event> {
        match self {
            SessionMsg::Start => Some(Event::Start),
            SessionMsg::RetryLocation => Some(Event::RetryLocation),
            SessionMsg::SetLineQuery(s) => Some(Event::SetLineQuery(s)),
            SessionMsg::SubmitQuery => Some(Event::SubmitQuery),
            SessionMsg::SelectVehicle(id) => Some(Event::SelectVehicle(id)),
            SessionMsg::LocationDone(r) => Some(Event::LocationResolved(r)),
            SessionMsg::QueryDone(r) => Some(Event::QueryResolved(r)),
            SessionMsg::Snapshot(_) | SessionMsg::Markers(_) => None,
        }
    }
}

/// What a session needs to run.
///
#[derive(Clone, Debug)]
pub struct SessionArgs {
    /// Operator id sent with every query
    pub operator: String,
    pub location: LocationProvider,
    pub service: Arc<dyn VehicleQueryService>,
    pub view: Arc<dyn MapView>,
}

pub struct SessionState {
    session: TrackingSession,
    location: LocationProvider,
    service: Arc<dyn VehicleQueryService>,
    view: Arc<dyn MapView>,
    sync: SelectionCameraSync,
    /// Markers last sent to the view
    markers: Vec<DisplayMarker>,
    tx: watch::Sender<SessionContext>,
}

impl SessionState {
    /// Carry out one effect.  Slow ones are spawned and report back to `myself`.
    ///
    fn run(&mut self, myself: &ActorRef<SessionMsg>, effect: Effect) {
        trace!("run({effect:?})");

        match effect {
            Effect::AcquireLocation => {
                let location = self.location.clone();
                let me = myself.clone();
                tokio::spawn(async move {
                    let res = location.acquire().await;
                    if let Err(e) = cast!(me, SessionMsg::LocationDone(res)) {
                        warn!("session gone, location result dropped: {e}");
                    }
                });
            }
            Effect::Fetch { operator, lines } => {
                let service = self.service.clone();
                let me = myself.clone();
                tokio::spawn(async move {
                    let res = service.fetch(&operator, &lines).await;
                    if let Err(e) = cast!(me, SessionMsg::QueryDone(res)) {
                        warn!("session gone, query result dropped: {e}");
                    }
                });
            }
            fx => self.sync.apply(&fx, Instant::now()),
        }
    }

    /// Push markers to the view if they changed, then publish the context.
    ///
    fn refresh(&mut self) {
        let ctx = self.session.context();
        let markers = reconcile(ctx.user_position, ctx.visible_results());
        if markers != self.markers {
            debug!("{} marker(s)", markers.len());
            self.view.show_markers(&markers);
            self.markers = markers;
        }
        self.tx.send_replace(ctx.clone());
    }
}

#[ractor::async_trait]
impl Actor for SessionActor {
    type Msg = SessionMsg;
    type State = SessionState;
    type Arguments = (SessionArgs, watch::Sender<SessionContext>);

    #[tracing::instrument(skip(self, myself, args))]
    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let (args, tx) = args;
        trace!("session({:?}) starting for operator {}", myself.get_name(), args.operator);

        Ok(SessionState {
            session: TrackingSession::new(&args.operator),
            location: args.location,
            service: args.service,
            sync: SelectionCameraSync::new(args.view.clone()),
            view: args.view,
            markers: vec![],
            tx,
        })
    }

    #[tracing::instrument(skip(self, myself, state))]
    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            SessionMsg::Snapshot(sender) => {
                sender.send(state.session.context().clone())?;
            }
            SessionMsg::Markers(sender) => {
                sender.send(state.markers.clone())?;
            }
            msg => {
                let Some(event) = msg.into_event() else {
                    return Ok(());
                };
                let effects = state.session.handle(event);
                for fx in effects {
                    state.run(&myself, fx);
                }
                state.refresh();
            }
        }
        Ok(())
    }
}
