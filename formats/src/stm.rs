//! Module to load and process the data coming from the Montevideo STM online service.
//!
//! Request is a small JSON object naming the operator (`empresa`) and the lines (`lineas`),
//! the answer is a GeoJSON `FeatureCollection` with one `Point` feature per bus:
//!
//! ```json
//! {
//!   "type": "FeatureCollection",
//!   "features": [
//!     {
//!       "type": "Feature",
//!       "properties": { "id": 1234, "linea": "405", "destinoDesc": "PEÑAROL", "sublinea": "..." },
//!       "geometry": { "type": "Point", "coordinates": [-56.20, -34.91] }
//!     }
//!   ]
//! }
//! ```
//!
//! Ids and line numbers come either as strings or as numbers depending on the day, we keep
//! them all as strings.
//!

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::{lonlat_to_position, FormatError, VehicleRecord};

/// What we POST to the service.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StmRequest {
    /// Operator identifier
    #[serde(rename = "empresa")]
    pub operator: String,
    /// Line identifiers
    #[serde(rename = "lineas")]
    pub lines: Vec<String>,
}

impl StmRequest {
    pub fn new(operator: &str, lines: &[String]) -> Self {
        StmRequest {
            operator: operator.to_owned(),
            lines: lines.to_vec(),
        }
    }
}

/// Top-level answer.
///
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    /// "FeatureCollection" when present
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// One feature per vehicle
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    pub properties: Properties,
    pub geometry: Geometry,
}

/// The bits of `properties` we use, everything else is ignored.
///
#[derive(Debug, Deserialize)]
pub struct Properties {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub linea: String,
    #[serde(rename = "destinoDesc", default, deserialize_with = "string_or_number")]
    pub destino_desc: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub sublinea: String,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    /// `[longitude, latitude]`
    pub coordinates: Vec<f64>,
}

/// Accept `"405"`, `405` or `null`.
///
fn string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(de)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

impl FeatureCollection {
    /// Deserialize from json
    ///
    #[tracing::instrument(skip(input))]
    pub fn from_json(input: &str) -> Result<Self, FormatError> {
        trace!("featurecollection::from_json");

        let fc: FeatureCollection = serde_json::from_str(input)
            .map_err(|e| FormatError::MalformedResponse(e.to_string()))?;
        match fc.kind.as_deref() {
            None | Some("FeatureCollection") => Ok(fc),
            Some(kind) => Err(FormatError::MalformedResponse(format!("unexpected type {kind}"))),
        }
    }

    /// Map every feature 1:1 into a `VehicleRecord`, keeping the order of the answer.
    ///
    #[tracing::instrument(skip(self))]
    pub fn to_vehicles(&self) -> Result<Vec<VehicleRecord>, FormatError> {
        let res = self
            .features
            .iter()
            .enumerate()
            .map(|(i, f)| f.to_vehicle(i))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("{} vehicles", res.len());
        Ok(res)
    }
}

impl Feature {
    fn to_vehicle(&self, index: usize) -> Result<VehicleRecord, FormatError> {
        let coords: [f64; 2] = match self.geometry.coordinates.as_slice() {
            [lon, lat, ..] => [*lon, *lat],
            _ => return Err(FormatError::BadCoordinates(index)),
        };

        Ok(VehicleRecord {
            id: self.properties.id.clone(),
            position: lonlat_to_position(coords),
            line_label: self.properties.linea.clone(),
            destination_label: self.properties.destino_desc.clone(),
            sub_line_label: self.properties.sublinea.clone(),
        })
    }
}

/// Decode a raw answer into our records.
///
pub fn decode_vehicles(input: &str) -> Result<Vec<VehicleRecord>, FormatError> {
    FeatureCollection::from_json(input)?.to_vehicles()
}
