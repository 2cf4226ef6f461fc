// crates/dirmap-core/src/loader/local.rs
use super::common_io::{data_file_name, open_stream};
use super::{parse_data, DataSource, InputFormat, LoadedData};
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads `<dir>/<user>.json`, falling back to `<dir>/<user>.json.gz`.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
    format: InputFormat,
}

impl DirSource {
    pub fn new(dir: impl AsRef<Path>, format: InputFormat) -> Self {
        DirSource {
            dir: dir.as_ref().to_path_buf(),
            format,
        }
    }

    /// The path that will be read for `user`.
    pub fn path_for(&self, user: &str) -> PathBuf {
        let plain = self.dir.join(data_file_name(user));
        if plain.exists() {
            return plain;
        }
        let gz = self.dir.join(format!("{}.gz", data_file_name(user)));
        if gz.exists() {
            gz
        } else {
            plain
        }
    }
}

impl DataSource for DirSource {
    fn fetch(&self, user: &str) -> Result<LoadedData> {
        let path = self.path_for(user);
        debug!(path = %path.display(), "reading data file");
        let reader = open_stream(&path)?;
        parse_data(reader, self.format)
    }
}
