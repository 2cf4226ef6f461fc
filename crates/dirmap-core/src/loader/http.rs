// crates/dirmap-core/src/loader/http.rs
#![cfg(feature = "net")]

use super::common_io::data_file_name;
use super::{parse_data, DataSource, InputFormat, LoadedData};
use crate::error::{MapError, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::debug;

/// Fetches `<base_url>/<user>.json`, the way the page fetched it relative
/// to its own location.
pub struct HttpSource {
    client: Client,
    base_url: String,
    format: InputFormat,
}

impl HttpSource {
    pub fn new(base_url: &str, format: InputFormat) -> Result<Self> {
        Ok(HttpSource {
            client: Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_owned(),
            format,
        })
    }

    pub fn url_for(&self, user: &str) -> String {
        format!("{}/{}", self.base_url, data_file_name(user))
    }
}

impl DataSource for HttpSource {
    fn fetch(&self, user: &str) -> Result<LoadedData> {
        let url = self.url_for(user);
        debug!(%url, "fetching data file");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| MapError::Fetch(format!("Could not fetch {url}: {e}")))?;
        check_status(response.status(), user)?;

        let bytes = response.bytes()?;
        parse_data(bytes.as_ref(), self.format)
    }
}

/// Any non-success status reads as a missing data file.
fn check_status(status: StatusCode, user: &str) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(MapError::Fetch(format!(
            "Could not find data file: {}",
            data_file_name(user)
        )))
    }
}
