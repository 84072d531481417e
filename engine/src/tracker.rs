//! `Tracker` is the handle everyone else uses to drive a session actor.
//!
//! Operations are fire-and-forget like taps on a screen.  `snapshot()` and `markers()` are
//! answered by the actor after every message sent before them, `settle()` additionally waits
//! for the pending location or query to come back.
//!

use eyre::{eyre, Result};
use ractor::{call, cast, Actor, ActorRef};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::{DisplayMarker, SessionActor, SessionArgs, SessionContext, SessionMsg, ViewState};

#[derive(Clone, Debug)]
pub struct Tracker {
    actor: ActorRef<SessionMsg>,
    rx: watch::Receiver<SessionContext>,
}

impl Tracker {
    /// Start a new session actor.
    ///
    #[tracing::instrument(skip(args))]
    pub async fn spawn(name: Option<String>, args: SessionArgs) -> Result<(Self, JoinHandle<()>)> {
        trace!("tracker::spawn");

        let (tx, rx) = watch::channel(SessionContext::default());
        let (actor, handle) = Actor::spawn(name, SessionActor, (args, tx)).await?;
        Ok((Tracker { actor, rx }, handle))
    }

    pub fn start(&self) -> Result<()> {
        Ok(cast!(self.actor, SessionMsg::Start)?)
    }

    pub fn retry_location(&self) -> Result<()> {
        Ok(cast!(self.actor, SessionMsg::RetryLocation)?)
    }

    pub fn set_line_query(&self, text: &str) -> Result<()> {
        Ok(cast!(self.actor, SessionMsg::SetLineQuery(text.to_string()))?)
    }

    pub fn submit_query(&self) -> Result<()> {
        Ok(cast!(self.actor, SessionMsg::SubmitQuery)?)
    }

    pub fn select_vehicle(&self, id: &str) -> Result<()> {
        Ok(cast!(self.actor, SessionMsg::SelectVehicle(id.to_string()))?)
    }

    /// Current context.
    ///
    pub async fn snapshot(&self) -> Result<SessionContext> {
        let ctx = call!(self.actor, SessionMsg::Snapshot)?;
        Ok(ctx)
    }

    /// Markers as last sent to the map.
    ///
    pub async fn markers(&self) -> Result<Vec<DisplayMarker>> {
        let markers = call!(self.actor, SessionMsg::Markers)?;
        Ok(markers)
    }

    /// Follow context changes.
    ///
    pub fn subscribe(&self) -> watch::Receiver<SessionContext> {
        self.rx.clone()
    }

    /// Wait until nothing is pending: no query in flight and, before we have a position, an
    /// answer from the location provider.  Never returns if the session was not started.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn settle(&self) -> Result<SessionContext> {
        let mut rx = self.rx.clone();

        // Everything sent before is processed once this returns.
        self.snapshot().await?;

        let ctx = rx
            .wait_for(|ctx| !is_pending(ctx))
            .await
            .map_err(|e| eyre!("session stopped: {e}"))?;
        Ok(ctx.clone())
    }

    pub fn stop(&self) {
        self.actor.stop(None);
    }
}

fn is_pending(ctx: &SessionContext) -> bool {
    match ctx.view_state {
        ViewState::Initializing => ctx.last_error.is_none(),
        ViewState::Querying { .. } => true,
        _ => false,
    }
}
