// crates/dirmap-core/src/error.rs
use thiserror::Error;

/// Errors that can stop the pipeline before or while loading.
///
/// Per-record problems (missing director or birthplace) and per-location
/// geocoding misses are *not* errors; they are skipped and only logged.
#[derive(Debug, Error)]
pub enum MapError {
    /// A required setting (the username, a config value) is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The data file could not be retrieved (missing file, HTTP failure).
    #[error("{0}")]
    Fetch(String),

    /// The data file was read but its content is unusable (empty, not a list).
    #[error("{0}")]
    Data(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "net")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid cleanup pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;
