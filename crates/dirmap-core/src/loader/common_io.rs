// crates/dirmap-core/src/loader/common_io.rs
use crate::error::{MapError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::read::GzDecoder;

/// `<user>.json`, the file name the page fetched.
pub fn data_file_name(user: &str) -> String {
    format!("{user}.json")
}

pub fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Opens a data file, buffered, and unzips it on the fly when it ends in
/// `.gz`. Returns a generic reader so callers don't care about compression.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        MapError::Fetch(format!(
            "Could not find data file: {} ({e})",
            path.display()
        ))
    })?;

    let reader = BufReader::new(file);

    if is_gzip(path) {
        #[cfg(feature = "compact")]
        {
            return Ok(Box::new(GzDecoder::new(reader)));
        }
        #[cfg(not(feature = "compact"))]
        {
            return Err(MapError::Configuration(format!(
                "{} is gzip-compressed but the 'compact' feature is disabled",
                path.display()
            )));
        }
    }

    Ok(Box::new(reader))
}
