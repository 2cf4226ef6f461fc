// crates/dirmap-core/src/loader/mod.rs

//! # Data Loader
//!
//! Resolves `<username>.json` against a directory or a base URL and parses
//! one of the two input contracts:
//!
//! - [`InputFormat::Films`]: a list of [`FilmRecord`] objects.
//! - [`InputFormat::Prepared`]: a list of already geocoded
//!   [`PreparedLocation`] objects.
//!
//! The caller picks the contract; the loader never guesses.

pub mod common_io;
#[cfg(feature = "net")]
mod http;
mod local;

#[cfg(feature = "net")]
pub use http::HttpSource;
pub use local::DirSource;

use crate::error::{MapError, Result};
use crate::raw::{FilmRecord, FilmRecordsRaw, PreparedLocation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;
use tracing::debug;

/// Which contract the data file follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    Films,
    Prepared,
}

/// A parsed data file.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedData {
    Films(FilmRecordsRaw),
    Prepared(Vec<PreparedLocation>),
}

/// Where `<username>.json` comes from.
pub trait DataSource {
    fn fetch(&self, user: &str) -> Result<LoadedData>;
}

/// Parses a data file in the given format.
pub fn parse_data<R: Read>(reader: R, format: InputFormat) -> Result<LoadedData> {
    let value: Value = serde_json::from_reader(reader)?;
    Ok(match format {
        InputFormat::Films => LoadedData::Films(records_from_value(value)?),
        InputFormat::Prepared => LoadedData::Prepared(prepared_from_value(value)?),
    })
}

/// Parses a film record list. Entries that are not records (`null`,
/// numbers, objects with wrongly typed fields) become `None` instead of
/// failing the whole file.
pub fn parse_records<R: Read>(reader: R) -> Result<FilmRecordsRaw> {
    let value: Value = serde_json::from_reader(reader)?;
    records_from_value(value)
}

fn expect_list(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Err(MapError::Data("Data file is empty.".into())),
        _ => Err(MapError::Data("Data file is not a list.".into())),
    }
}

fn records_from_value(value: Value) -> Result<FilmRecordsRaw> {
    Ok(expect_list(value)?
        .into_iter()
        .map(|item| serde_json::from_value::<FilmRecord>(item).ok())
        .collect())
}

fn prepared_from_value(value: Value) -> Result<Vec<PreparedLocation>> {
    let items = expect_list(value)?;
    let total = items.len();
    let out: Vec<PreparedLocation> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if out.len() < total {
        debug!(skipped = total - out.len(), "malformed prepared locations skipped");
    }
    Ok(out)
}
