// crates/dirmap-core/src/geocode/mod.rs

//! # Geocode Resolver
//!
//! The pipeline depends on a [`Geocoder`] it is handed, never on a concrete
//! service. It calls the geocoder once per unique location, strictly one
//! call at a time, in location discovery order, and keeps only the first
//! candidate of each answer.

#[cfg(feature = "net")]
pub mod nominatim;

use crate::error::Result;
use crate::model::GeocodedLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A coordinate candidate returned by a geocoder: `x` is the longitude,
/// `y` the latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub x: f64,
    pub y: f64,
}

/// Place name → coordinate candidates, best first.
///
/// An empty list means "not found". Calls may block for as long as the
/// underlying service takes; the caller imposes no timeout.
pub trait Geocoder {
    fn search(&mut self, query: &str) -> Result<Vec<Candidate>>;
}

/// Any `FnMut(&str) -> Result<Vec<Candidate>>` is a geocoder, which keeps
/// fixtures and bindings short.
impl<F> Geocoder for F
where
    F: FnMut(&str) -> Result<Vec<Candidate>>,
{
    fn search(&mut self, query: &str) -> Result<Vec<Candidate>> {
        self(query)
    }
}

/// Looks up one cleaned location and keeps the first candidate.
///
/// No retry: an empty answer and a failed call both yield `None`. A failed
/// call is logged, since a single lookup must not abort a load that has
/// already started plotting.
pub fn resolve<G: Geocoder + ?Sized>(
    geocoder: &mut G,
    raw_label: &str,
    query: &str,
) -> Option<GeocodedLocation> {
    let candidates = match geocoder.search(query) {
        Ok(c) => c,
        Err(e) => {
            warn!(location = raw_label, query, error = %e, "geocoding failed");
            return None;
        }
    };

    match candidates.first() {
        Some(first) => Some(GeocodedLocation {
            raw_label: raw_label.to_owned(),
            lat: first.y,
            lon: first.x,
        }),
        None => {
            debug!(location = raw_label, query, "no geocoding result");
            None
        }
    }
}
