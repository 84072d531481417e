//! Geographic position
//!

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A point on the map, in decimal degrees.
///
/// Created by the location provider or decoded from a vehicle geometry, never modified
/// afterwards.
///
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Position {
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
}

impl Position {
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Position {
            latitude,
            longitude,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

/// Convert a GeoJSON coordinate pair into a `Position`.
///
/// GeoJSON puts the longitude first: `[lon, lat]`.
///
#[inline]
pub fn lonlat_to_position(coords: [f64; 2]) -> Position {
    let [longitude, latitude] = coords;
    Position {
        latitude,
        longitude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lonlat_inversion() {
        let p = lonlat_to_position([-56.18, -34.90]);

        assert_eq!(-34.90, p.latitude);
        assert_eq!(-56.18, p.longitude);
    }

    #[test]
    fn test_position_display() {
        let p = Position::new(-34.9, -56.18);
        assert_eq!("(-34.90000, -56.18000)", p.to_string());
    }
}
