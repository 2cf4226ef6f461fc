// crates/dirmap-core/src/lib.rs

//! # dirmap-core
//!
//! Groups film directors by birthplace, geocodes each unique place once and
//! plots one marker per place, with a popup listing the directors born there
//! and their films.
//!
//! ```rust
//! use dirmap_core::prelude::*;
//!
//! let records = vec![
//!     Some(FilmRecord::new("Agnès Varda", "Ixelles, Belgium", "Cléo from 5 to 7")),
//!     None,
//! ];
//! let mut geocoder = |_: &str| -> Result<Vec<Candidate>> {
//!     Ok(vec![Candidate { x: 4.37, y: 50.83 }])
//! };
//! let mut session = MapSession::default();
//! let stats = Pipeline::new(&mut geocoder)
//!     .run_records(&records, &mut session, &mut NullReporter)?;
//! assert_eq!(stats.plotted, 1);
//! # Ok::<(), MapError>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod aggregate;
pub mod common;
pub mod config;
pub mod enrich;
pub mod error;
pub mod geocode;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod plot;
// Input contracts shared by the loader, the pipeline and the enricher
pub mod raw;
pub mod render;
pub mod session;
pub mod text;

// Re-exports
pub use crate::common::PipelineStats;
pub use crate::config::AppConfig;
pub use crate::error::{MapError, Result};
pub use crate::geocode::{Candidate, Geocoder};
pub use crate::loader::{DataSource, DirSource, InputFormat, LoadedData};
pub use crate::model::{GeocodedLocation, LocationAggregate};
pub use crate::pipeline::{LoadState, Pipeline, StatusEvent, StatusReporter};
pub use crate::plot::MarkerStyle;
pub use crate::raw::{FilmRecord, PreparedLocation};
pub use crate::session::{MapMarker, MapSession};
pub use crate::text::{clean_birthplace, LocationNormalizer};

#[cfg(feature = "net")]
pub use crate::geocode::nominatim::NominatimGeocoder;
#[cfg(feature = "net")]
pub use crate::loader::HttpSource;

/// Everything needed to run a load.
pub mod prelude {
    pub use crate::error::{MapError, Result};
    pub use crate::geocode::{Candidate, Geocoder};
    pub use crate::loader::{DataSource, DirSource, InputFormat};
    pub use crate::pipeline::{LoadState, NullReporter, Pipeline, StatusEvent, StatusReporter};
    pub use crate::plot::MarkerStyle;
    pub use crate::raw::FilmRecord;
    pub use crate::session::MapSession;
}
