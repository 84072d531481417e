//! Our own vehicle record, decoded from whatever the site sends.
//!

use serde::{Deserialize, Serialize};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::Position;

/// One bus as reported by a single query.
///
/// A fresh set is created by each successful query and replaces the previous one as a whole.
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct VehicleRecord {
    /// Vehicle id, unique within one answer
    pub id: String,
    /// Where it is
    pub position: Position,
    /// Line (e.g. "405")
    pub line_label: String,
    /// Destination (e.g. "PLAYA DEL CERRO")
    pub destination_label: String,
    /// Variant of the line
    pub sub_line_label: String,
}

impl VehicleRecord {
    /// One-line summary as shown in the result list: line, destination then sub-line.
    ///
    pub fn summary(&self) -> String {
        [
            self.line_label.as_str(),
            self.destination_label.as_str(),
            self.sub_line_label.as_str(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Render a set of vehicles as a table.
///
pub fn list_vehicles(data: &[VehicleRecord]) -> String {
    let mut builder = Builder::default();
    builder.push_record(vec!["Id", "Line", "Destination", "Sub-line", "Lat/Lon"]);

    data.iter().for_each(|v| {
        builder.push_record(vec![
            v.id.clone(),
            v.line_label.clone(),
            v.destination_label.clone(),
            v.sub_line_label.clone(),
            format!("{:.5}, {:.5}", v.position.latitude, v.position.longitude),
        ]);
    });

    builder.build().with(Style::modern()).to_string()
}
