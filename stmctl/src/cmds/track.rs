//! This is the module handling the `track` sub-command.
//!
//! The session runs exactly like it would behind a screen, the difference being that we wait
//! for each step to settle before doing the next one.
//!

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use eyre::Result;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{info, trace, warn};

use stm_common::{find_location, Location};
use stm_engine::{
    DisplayMarker, LocationProvider, RecordingView, SessionArgs, SessionContext,
    StaticGeolocation, Tracker, ViewState,
};
use stm_formats::{list_vehicles, Position};
use stm_sources::Sources;

use crate::{Config, Status, TrackOpts};

/// Parse `LAT,LON`.
///
pub fn parse_position(s: &str) -> Result<Position, Status> {
    let bad = || Status::BadPosition(s.to_string());

    let (lat, lon) = s.split_once(',').ok_or_else(bad)?;
    let lat: f64 = lat.trim().parse().map_err(|_| bad())?;
    let lon: f64 = lon.trim().parse().map_err(|_| bad())?;
    if !(-90. ..=90.).contains(&lat) || !(-180. ..=180.).contains(&lon) {
        return Err(bad());
    }
    Ok(Position::new(lat, lon))
}

/// Where do we pretend to be?  Without `--at` or `--location`, permission is denied.
///
pub fn geolocation_from_opts(
    topts: &TrackOpts,
    locations: &BTreeMap<String, Location>,
) -> Result<StaticGeolocation> {
    if let Some(at) = &topts.at {
        return Ok(StaticGeolocation::granted(parse_position(at)?));
    }
    if let Some(name) = &topts.location {
        return Ok(StaticGeolocation::from(find_location(locations, name)?));
    }
    Ok(StaticGeolocation::denied())
}

/// Render markers as a table.
///
pub fn list_markers(markers: &[DisplayMarker]) -> String {
    let mut builder = Builder::default();
    builder.push_record(vec!["Marker", "Icon", "Lat/Lon"]);

    markers.iter().for_each(|m| {
        builder.push_record(vec![
            m.key.to_string(),
            m.icon.to_string(),
            format!("{:.5}, {:.5}", m.position.latitude, m.position.longitude),
        ]);
    });

    builder.build().with(Style::modern()).to_string()
}

/// Run one session.
///
#[tracing::instrument(skip(cfg, sources))]
pub async fn track_line(cfg: &Config, sources: &Sources, topts: &TrackOpts) -> Result<()> {
    trace!("track_line");

    let site = topts.site.as_deref().unwrap_or(cfg.site());
    let service = sources.as_service(site)?;
    let geo = geolocation_from_opts(topts, &cfg.locations()?)?;

    let view = Arc::new(RecordingView::default());
    let args = SessionArgs {
        operator: service.operator(),
        location: LocationProvider::new(Arc::new(geo)),
        service,
        view: view.clone(),
    };
    let (tracker, _h) = Tracker::spawn(Some(format!("session-{site}")), args).await?;

    let res = run(&tracker, &view, cfg, topts).await;
    tracker.stop();
    res
}

async fn settle(tracker: &Tracker, secs: u64) -> Result<SessionContext> {
    match tokio::time::timeout(Duration::from_secs(secs), tracker.settle()).await {
        Ok(ctx) => ctx,
        Err(_) => Err(Status::Timeout(secs).into()),
    }
}

async fn run(
    tracker: &Tracker,
    view: &RecordingView,
    cfg: &Config,
    topts: &TrackOpts,
) -> Result<()> {
    // Position first
    //
    tracker.start()?;
    let ctx = settle(tracker, topts.timeout).await?;
    let Some(pos) = ctx.user_position else {
        let reason = ctx
            .last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        return Err(Status::NoPosition(reason).into());
    };
    info!("Position: {pos}");

    // Then the query
    //
    let line = topts
        .line
        .clone()
        .or_else(|| cfg.line.clone())
        .unwrap_or_default();
    tracker.set_line_query(&line)?;
    tracker.submit_query()?;

    let ctx = settle(tracker, topts.timeout).await?;
    let ViewState::Ready(results) = &ctx.view_state else {
        let reason = ctx
            .last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no result".to_string());
        return Err(Status::QueryFailed(reason).into());
    };

    println!("Line '{}': {} vehicle(s)", line, results.len());
    println!("{}", list_markers(&tracker.markers().await?));
    if !results.is_empty() {
        println!("{}", list_vehicles(results));
    }

    // Optional selection
    //
    if let Some(id) = &topts.select {
        tracker.select_vehicle(id)?;
        let ctx = tracker.snapshot().await?;
        match ctx.selected() {
            Some(v) if v.id == *id => {
                println!("Selected {}: {}", v.id, v.summary());
                if let Some(region) = view.region() {
                    println!(
                        "Camera: {} span {}x{}",
                        region.center(),
                        region.latitude_delta,
                        region.longitude_delta
                    );
                }
            }
            _ => warn!("vehicle {id} not in results, selection ignored"),
        }
    }
    Ok(())
}
