// crates/dirmap-core/src/raw.rs
use serde::{Deserialize, Serialize};

/// One film entry as it comes from `<username>.json`.
///
/// Every field is optional at parse time: the aggregator decides what to
/// skip, so a partial record never fails the whole file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmRecord {
    #[serde(default)]
    pub director_name: Option<String>,
    #[serde(default)]
    pub birthplace: Option<String>,
    #[serde(default)]
    pub film_title: Option<String>,
}

impl FilmRecord {
    pub fn new(director: &str, birthplace: &str, title: &str) -> Self {
        FilmRecord {
            director_name: Some(director.to_owned()),
            birthplace: Some(birthplace.to_owned()),
            film_title: Some(title.to_owned()),
        }
    }
}

/// Records as parsed from the data file. `None` marks a `null` or
/// non-object entry.
pub type FilmRecordsRaw = Vec<Option<FilmRecord>>;

/// The pre-aggregated contract: one entry per already geocoded location.
///
/// Written by the export step and accepted as an alternative input, in
/// which case no aggregation or geocoding happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedLocation {
    pub lat: f64,
    pub lon: f64,
    pub popup_html: String,
    #[serde(default)]
    pub directors: Vec<String>,
}
