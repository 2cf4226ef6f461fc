// crates/dirmap-core/src/geocode/nominatim.rs
#![cfg(feature = "net")]

use super::{Candidate, Geocoder};
use crate::error::{MapError, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = concat!("dirmap/", env!("CARGO_PKG_VERSION"));
/// The public Nominatim instance asks for at most one request per second.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// One hit of a `format=json` search. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

/// Blocking client for an OpenStreetMap Nominatim `/search` endpoint.
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
    delay: Duration,
    last_call: Option<Instant>,
}

impl NominatimGeocoder {
    pub fn new() -> Result<Self> {
        Self::with_options(DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, DEFAULT_DELAY)
    }

    pub fn with_options(endpoint: &str, user_agent: &str, delay: Duration) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(NominatimGeocoder {
            client,
            endpoint: endpoint.to_owned(),
            delay,
            last_call: None,
        })
    }

    /// Sleeps until `delay` has passed since the previous request.
    fn wait_turn(&mut self) {
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                std::thread::sleep(self.delay - elapsed);
            }
        }
        self.last_call = Some(Instant::now());
    }
}

impl Geocoder for NominatimGeocoder {
    fn search(&mut self, query: &str) -> Result<Vec<Candidate>> {
        self.wait_turn();
        debug!(query, endpoint = %self.endpoint, "nominatim search");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()?;

        let status = response.status();
        let body = response.text()?;
        candidates_from(status, &body, query)
    }
}

/// Maps one `/search` response to candidates. A non-success status is a
/// fetch error; hits with unparsable coordinates are dropped.
fn candidates_from(status: StatusCode, body: &str, query: &str) -> Result<Vec<Candidate>> {
    if !status.is_success() {
        return Err(MapError::Fetch(format!(
            "Geocoder returned {status} for {query:?}"
        )));
    }
    let hits: Vec<NominatimHit> = serde_json::from_str(body)?;
    Ok(hits.iter().filter_map(to_candidate).collect())
}

fn to_candidate(hit: &NominatimHit) -> Option<Candidate> {
    Some(Candidate {
        x: hit.lon.trim().parse().ok()?,
        y: hit.lat.trim().parse().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_coordinates() {
        let hits: Vec<NominatimHit> = serde_json::from_str(
            r#"[{"lat":"51.5073219","lon":"-0.1276474","display_name":"London"},
                {"lat":"n/a","lon":"0"}]"#,
        )
        .unwrap();
        let out: Vec<_> = hits.iter().filter_map(to_candidate).collect();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].y, 51.5073219);
        assert_eq!(out[0].x, -0.1276474);
    }

    #[test]
    fn error_status_is_a_fetch_error() {
        let err = candidates_from(StatusCode::SERVICE_UNAVAILABLE, "", "Calanda, Spain").unwrap_err();
        match err {
            MapError::Fetch(msg) => {
                assert!(msg.contains("503"), "{msg}");
                assert!(msg.contains("\"Calanda, Spain\""), "{msg}");
            }
            other => panic!("expected Fetch, got {other:?}"),
        }
    }

    #[test]
    fn success_body_maps_to_candidates() {
        let body = r#"[{"lat":"40.94","lon":"-0.23"}]"#;
        let out = candidates_from(StatusCode::OK, body, "Calanda, Spain").unwrap();
        assert_eq!(out, vec![Candidate { x: -0.23, y: 40.94 }]);

        assert!(candidates_from(StatusCode::OK, "[]", "Atlantis").unwrap().is_empty());
        assert!(matches!(
            candidates_from(StatusCode::OK, "<html>", "Atlantis"),
            Err(MapError::Json(_))
        ));
    }
}
