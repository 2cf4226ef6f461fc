// crates/dirmap-core/src/pipeline.rs

//! # Load Pipeline
//!
//! Drives one load from username to plotted markers:
//!
//! ```text
//! Idle → Loading → Aggregating → Resolving/Plotting (per location) → Complete
//!                      ↘ Failed (fetch, parse or empty data)
//! ```
//!
//! Locations are geocoded strictly one after another: the loop does not
//! start location *i + 1* before the lookup for *i* returned. Status events
//! and marker insertion therefore follow discovery order.

use crate::aggregate::aggregate;
use crate::common::PipelineStats;
use crate::error::{MapError, Result};
use crate::geocode::{resolve, Geocoder};
use crate::loader::{DataSource, LoadedData};
use crate::model::{GeocodedLocation, LocationMap};
use crate::plot::{popup_html, MarkerStyle};
use crate::raw::{FilmRecord, PreparedLocation};
use crate::session::MapSession;
use crate::text::LocationNormalizer;
use std::fmt;
use tracing::{debug, error, info};

/// Where a load currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Aggregating,
    /// Waiting for the geocoder on location `index` (0-based) of `total`.
    Resolving { index: usize, total: usize },
    /// Adding the marker for location `index`.
    Plotting { index: usize, total: usize },
    Complete(PipelineStats),
    Failed(String),
}

impl LoadState {
    /// `Complete` or `Failed`: the pipeline will not run again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Complete(_) | LoadState::Failed(_))
    }
}

/// Progress messages for a status surface. `Display` gives the text shown
/// to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent<'a> {
    Loading { user: &'a str },
    Added { label: &'a str, processed: usize, total: usize },
    Skipping { label: &'a str, processed: usize, total: usize },
    Complete { plotted: usize, total: usize },
    Error { message: String },
}

impl fmt::Display for StatusEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEvent::Loading { user } => write!(f, "Loading data for {user}..."),
            StatusEvent::Added {
                label,
                processed,
                total,
            } => write!(f, "Added: {label} ({processed}/{total})"),
            StatusEvent::Skipping {
                label,
                processed,
                total,
            } => write!(f, "Skipping: {label} ({processed}/{total})"),
            StatusEvent::Complete { plotted, total } => {
                write!(f, "Complete! Plotted {plotted} of {total} locations.")
            }
            StatusEvent::Error { message } => write!(f, "Error: {message}"),
        }
    }
}

/// Receives status events. Not needed for correctness.
pub trait StatusReporter {
    fn report(&mut self, event: &StatusEvent<'_>);
}

impl<F> StatusReporter for F
where
    F: FnMut(&StatusEvent<'_>),
{
    fn report(&mut self, event: &StatusEvent<'_>) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl StatusReporter for NullReporter {
    fn report(&mut self, _event: &StatusEvent<'_>) {}
}

/// Checks the required username. Blank counts as missing.
pub fn require_user(user: Option<&str>) -> Result<&str> {
    match user.map(str::trim) {
        Some(u) if !u.is_empty() => Ok(u),
        _ => Err(MapError::Configuration(
            "No user specified. Pass a username to load its data file.".into(),
        )),
    }
}

/// One load. A pipeline runs once; its final state is kept for inspection.
pub struct Pipeline<G: Geocoder> {
    geocoder: G,
    normalizer: LocationNormalizer,
    style: MarkerStyle,
    state: LoadState,
    stats: PipelineStats,
}

impl<G: Geocoder> Pipeline<G> {
    pub fn new(geocoder: G) -> Self {
        Pipeline {
            geocoder,
            normalizer: LocationNormalizer::default(),
            style: MarkerStyle::default(),
            state: LoadState::Idle,
            stats: PipelineStats::default(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: LocationNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_style(mut self, style: MarkerStyle) -> Self {
        self.style = style;
        self
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Full load: check the user, fetch `<user>.json`, then plot.
    ///
    /// A missing user fails before the pipeline starts and leaves the state
    /// at `Idle`. Every later fatal error moves to `Failed` and is reported
    /// once through `reporter`.
    pub fn run(
        &mut self,
        user: Option<&str>,
        source: &dyn DataSource,
        session: &mut MapSession,
        reporter: &mut dyn StatusReporter,
    ) -> Result<PipelineStats> {
        let user = require_user(user)?;
        self.start()?;

        self.transition(LoadState::Loading);
        reporter.report(&StatusEvent::Loading { user });

        let data = match source.fetch(user) {
            Ok(data) => data,
            Err(e) => return Err(self.fail(e, reporter)),
        };

        match data {
            LoadedData::Films(records) => self.plot_records(&records, session, reporter),
            LoadedData::Prepared(prepared) => self.plot_prepared(&prepared, session, reporter),
        }
    }

    /// Aggregates `records`, then geocodes and plots every location.
    pub fn run_records(
        &mut self,
        records: &[Option<FilmRecord>],
        session: &mut MapSession,
        reporter: &mut dyn StatusReporter,
    ) -> Result<PipelineStats> {
        self.start()?;
        self.plot_records(records, session, reporter)
    }

    fn plot_records(
        &mut self,
        records: &[Option<FilmRecord>],
        session: &mut MapSession,
        reporter: &mut dyn StatusReporter,
    ) -> Result<PipelineStats> {
        self.transition(LoadState::Aggregating);
        let locations = match aggregate(records) {
            Ok(l) => l,
            Err(e) => return Err(self.fail(e, reporter)),
        };
        info!(locations = locations.len(), "locations aggregated");

        self.plot_locations(&locations, session, reporter);
        Ok(self.complete(reporter))
    }

    /// The per-location loop. Never fails: misses and empty queries are
    /// skipped.
    fn plot_locations(
        &mut self,
        locations: &LocationMap,
        session: &mut MapSession,
        reporter: &mut dyn StatusReporter,
    ) {
        let total = locations.len();
        self.stats = PipelineStats {
            total,
            ..PipelineStats::default()
        };

        for (index, (raw_label, group)) in locations.iter().enumerate() {
            self.stats.processed += 1;
            let processed = self.stats.processed;

            let query = self.normalizer.clean(raw_label);
            if query.is_empty() {
                debug!(location = raw_label, "nothing left after cleaning");
                continue;
            }

            self.transition(LoadState::Resolving { index, total });
            let Some(location) = resolve(&mut self.geocoder, raw_label, &query) else {
                reporter.report(&StatusEvent::Skipping {
                    label: raw_label,
                    processed,
                    total,
                });
                continue;
            };

            self.transition(LoadState::Plotting { index, total });
            let directors = group.directors.iter().map(|d| d.name.clone()).collect();
            session.add_marker(location, popup_html(raw_label, group), directors, self.style);
            self.stats.plotted += 1;
            reporter.report(&StatusEvent::Added {
                label: raw_label,
                processed,
                total,
            });
        }
    }

    /// Plots pre-aggregated locations directly; the geocoder is not used.
    fn plot_prepared(
        &mut self,
        prepared: &[PreparedLocation],
        session: &mut MapSession,
        reporter: &mut dyn StatusReporter,
    ) -> Result<PipelineStats> {
        self.transition(LoadState::Aggregating);
        if prepared.is_empty() {
            return Err(self.fail(MapError::Data("Data file is empty.".into()), reporter));
        }

        let total = prepared.len();
        self.stats = PipelineStats {
            total,
            ..PipelineStats::default()
        };
        for (index, p) in prepared.iter().enumerate() {
            self.stats.processed += 1;
            self.transition(LoadState::Plotting { index, total });

            let label = prepared_label(p);
            let location = GeocodedLocation {
                raw_label: label.clone(),
                lat: p.lat,
                lon: p.lon,
            };
            session.add_marker(location, p.popup_html.clone(), p.directors.clone(), self.style);
            self.stats.plotted += 1;
            reporter.report(&StatusEvent::Added {
                label: &label,
                processed: self.stats.processed,
                total,
            });
        }
        Ok(self.complete(reporter))
    }

    fn start(&mut self) -> Result<()> {
        if self.state.is_terminal() {
            return Err(MapError::Configuration(
                "this pipeline has already run; create a new one".into(),
            ));
        }
        Ok(())
    }

    fn transition(&mut self, next: LoadState) {
        debug!(from = ?self.state, to = ?next, "load state");
        self.state = next;
    }

    fn complete(&mut self, reporter: &mut dyn StatusReporter) -> PipelineStats {
        let stats = self.stats;
        info!(plotted = stats.plotted, total = stats.total, "load complete");
        self.transition(LoadState::Complete(stats));
        reporter.report(&StatusEvent::Complete {
            plotted: stats.plotted,
            total: stats.total,
        });
        stats
    }

    fn fail(&mut self, err: MapError, reporter: &mut dyn StatusReporter) -> MapError {
        error!(error = %err, "a critical error occurred");
        self.transition(LoadState::Failed(err.to_string()));
        reporter.report(&StatusEvent::Error {
            message: err.to_string(),
        });
        err
    }
}

/// Prepared files carry no birthplace label; name the marker after its
/// directors, or its coordinates when there are none.
fn prepared_label(p: &PreparedLocation) -> String {
    if p.directors.is_empty() {
        format!("{:.4}, {:.4}", p.lat, p.lon)
    } else {
        p.directors.join(", ")
    }
}
