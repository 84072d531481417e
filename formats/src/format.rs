use serde::{Deserialize, Serialize};
use strum::{EnumString, VariantNames};
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// The `Format` enum represents the payload formats a site can answer with.
///
/// Sites in `sources.hcl` refer to it by its kebab-case name.
///
/// ```rust
/// use stm_formats::Format;
///
/// let f: Format = "stm-online".parse().unwrap();
/// assert_eq!(Format::StmOnline, f);
/// ```
///
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Deserialize,
    PartialEq,
    Eq,
    strum::Display,
    EnumString,
    Serialize,
    VariantNames,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    #[default]
    None,
    /// GeoJSON feature collection from the Montevideo STM online service
    StmOnline,
}

impl Format {
    /// Short description of each format
    ///
    pub fn description(&self) -> &'static str {
        match self {
            Format::None => "no format",
            Format::StmOnline => "STM online bus positions (GeoJSON, [lon, lat])",
        }
    }

    /// List all supported formats as a table
    ///
    pub fn list() -> String {
        let mut builder = Builder::default();
        builder.push_record(vec!["Name", "Description"]);

        <Format as VariantNames>::VARIANTS
            .iter()
            .filter_map(|name| name.parse::<Format>().ok())
            .filter(|f| *f != Format::None)
            .for_each(|f| builder.push_record(vec![f.to_string(), f.description().to_string()]));

        let table = builder.build().with(Style::modern()).to_string();
        format!("List all formats:\n{table}")
    }
}
