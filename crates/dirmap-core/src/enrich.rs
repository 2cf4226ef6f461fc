// crates/dirmap-core/src/enrich.rs

//! # Film Enricher
//!
//! Builds the `<username>.json` record file from a plain list of film
//! titles. Each title goes through a [`FilmLookup`]; the default one asks
//! TMDB in three steps: movie search → credits (first crew member whose job
//! is `Director`) → person (`place_of_birth`). A title with any missing link
//! produces no record.

use crate::error::Result;
use crate::raw::FilmRecord;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::BufRead;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Title → complete film record, or `None` when some piece is missing.
pub trait FilmLookup {
    fn lookup(&mut self, title: &str) -> Result<Option<FilmRecord>>;
}

impl<F> FilmLookup for F
where
    F: FnMut(&str) -> Result<Option<FilmRecord>>,
{
    fn lookup(&mut self, title: &str) -> Result<Option<FilmRecord>> {
        self(title)
    }
}

/// Outcome of an enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub records: Vec<FilmRecord>,
    pub failed: Vec<String>,
}

/// Reads a title list: one title per line, blank lines ignored.
pub fn read_titles<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut titles = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let title = line.trim();
        if !title.is_empty() {
            titles.push(title.to_owned());
        }
    }
    Ok(titles)
}

/// Looks up every title in order, sleeping `delay` between titles.
///
/// A lookup error counts as a failed title; the run continues.
pub fn enrich_titles<L: FilmLookup + ?Sized>(
    titles: &[String],
    lookup: &mut L,
    delay: Duration,
) -> EnrichReport {
    let total = titles.len();
    info!(total, "enriching film titles");

    let mut report = EnrichReport::default();
    for (i, title) in titles.iter().enumerate() {
        info!("Processing ({}/{total}): {title}...", i + 1);
        match lookup.lookup(title) {
            Ok(Some(record)) => {
                info!(
                    director = record.director_name.as_deref().unwrap_or_default(),
                    "found director"
                );
                report.records.push(record);
            }
            Ok(None) => {
                warn!(title = %title, "could not find complete data for this film");
                report.failed.push(title.clone());
            }
            Err(e) => {
                warn!(title = %title, error = %e, "lookup failed");
                report.failed.push(title.clone());
            }
        }

        if i + 1 < total && !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    info!(
        enriched = report.records.len(),
        total, "enrichment complete"
    );
    report
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CreditsResponse {
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    id: Option<u64>,
    name: Option<String>,
    job: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PersonResponse {
    place_of_birth: Option<String>,
}

#[cfg_attr(not(feature = "net"), allow(dead_code))]
fn decode<T: DeserializeOwned>(body: Option<String>) -> Result<Option<T>> {
    body.map(|b| serde_json::from_str(&b)).transpose().map_err(Into::into)
}

/// The TMDB lookup chain over a `get(path, query)` that returns the response
/// body, or `None` for a non-success status.
#[cfg_attr(not(feature = "net"), allow(dead_code))]
fn tmdb_lookup<G>(title: &str, mut get: G) -> Result<Option<FilmRecord>>
where
    G: FnMut(&str, &[(&str, &str)]) -> Result<Option<String>>,
{
    let body = get("/search/movie", &[("query", title)])?;
    let Some(search) = decode::<SearchResponse>(body)? else {
        return Ok(None);
    };
    let Some(movie_id) = search.results.first().and_then(|r| r.id) else {
        return Ok(None);
    };

    let body = get(&format!("/movie/{movie_id}/credits"), &[])?;
    let Some(credits) = decode::<CreditsResponse>(body)? else {
        return Ok(None);
    };
    let Some(director) = credits
        .crew
        .into_iter()
        .find(|m| m.job.as_deref() == Some("Director"))
    else {
        return Ok(None);
    };
    let (Some(director_id), Some(director_name)) = (director.id, director.name) else {
        return Ok(None);
    };

    let body = get(&format!("/person/{director_id}"), &[])?;
    let Some(person) = decode::<PersonResponse>(body)? else {
        return Ok(None);
    };
    let Some(birthplace) = person.place_of_birth.filter(|b| !b.trim().is_empty()) else {
        return Ok(None);
    };

    Ok(Some(FilmRecord {
        director_name: Some(director_name),
        birthplace: Some(birthplace),
        film_title: Some(title.to_owned()),
    }))
}

#[cfg(feature = "net")]
pub use tmdb::TmdbClient;

#[cfg(feature = "net")]
mod tmdb {
    use super::{tmdb_lookup, FilmLookup};
    use crate::error::{MapError, Result};
    use crate::raw::FilmRecord;
    use reqwest::blocking::Client;

    pub const TMDB_API_BASE_URL: &str = "https://api.themoviedb.org/3";

    /// TMDB v3 client with an API key.
    pub struct TmdbClient {
        client: Client,
        base_url: String,
        api_key: String,
    }

    impl TmdbClient {
        pub fn new(api_key: &str) -> Result<Self> {
            Self::with_base_url(TMDB_API_BASE_URL, api_key)
        }

        pub fn with_base_url(base_url: &str, api_key: &str) -> Result<Self> {
            if api_key.trim().is_empty() {
                return Err(MapError::Configuration("TMDB API key is empty".into()));
            }
            Ok(TmdbClient {
                client: Client::builder().build()?,
                base_url: base_url.trim_end_matches('/').to_owned(),
                api_key: api_key.to_owned(),
            })
        }

        /// GET `path` with the API key. A non-success status is `Ok(None)`,
        /// the same as a missing piece of data.
        fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Option<String>> {
            let response = self
                .client
                .get(format!("{}{path}", self.base_url))
                .query(&[("api_key", self.api_key.as_str())])
                .query(query)
                .send()?;
            if !response.status().is_success() {
                return Ok(None);
            }
            Ok(Some(response.text()?))
        }
    }

    impl FilmLookup for TmdbClient {
        fn lookup(&mut self, title: &str) -> Result<Option<FilmRecord>> {
            tmdb_lookup(title, |path, query| self.get(path, query))
        }
    }
}
