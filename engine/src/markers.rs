//! Turn a result set into map markers.
//!
//! Markers are rebuilt from scratch on every call and keyed by vehicle id, the same way the
//! result set itself is replaced as a whole by every query.
//!

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;

use stm_formats::{Position, VehicleRecord};

/// Identity of a marker.
///
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum MarkerKey {
    /// The user's own position, at most one
    User,
    /// A bus, by id
    Vehicle(String),
}

impl Display for MarkerKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerKey::User => write!(f, "self"),
            MarkerKey::Vehicle(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum MarkerIcon {
    UserPin,
    Bus,
}

/// What the map display gets: where, which icon and who.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DisplayMarker {
    pub key: MarkerKey,
    pub position: Position,
    pub icon: MarkerIcon,
}

/// Build the marker set: the user first if known, then one per vehicle in result order.
///
/// Duplicate ids keep the slot of the first occurrence and the data of the last one.
///
pub fn reconcile(user: Option<Position>, results: &[VehicleRecord]) -> Vec<DisplayMarker> {
    let mut markers = Vec::with_capacity(results.len() + 1);

    if let Some(position) = user {
        markers.push(DisplayMarker {
            key: MarkerKey::User,
            position,
            icon: MarkerIcon::UserPin,
        });
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for v in results {
        let marker = DisplayMarker {
            key: MarkerKey::Vehicle(v.id.clone()),
            position: v.position,
            icon: MarkerIcon::Bus,
        };
        match seen.get(v.id.as_str()) {
            Some(&slot) => markers[slot] = marker,
            None => {
                seen.insert(v.id.as_str(), markers.len());
                markers.push(marker);
            }
        }
    }
    markers
}
