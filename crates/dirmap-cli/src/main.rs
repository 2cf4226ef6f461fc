//! dirmap: command-line front end for dirmap-core
//!
//! Loads `<user>.json`, groups the directors by birthplace, geocodes each
//! place with Nominatim and writes a Leaflet page plus GeoJSON.
//!
//! Usage examples
//! --------------
//!
//! - Plot a user's list from ./data into ./maps
//!   $ dirmap --user blessedheart --data-dir data plot --out maps
//!
//! - Same, with settings from a config file and pins instead of circles
//!   $ dirmap --config dirmap.toml plot --style pin --fit
//!
//! - Preview the groups and the cleaned geocoder queries
//!   $ dirmap --user blessedheart groups
//!
//! - Check what a birthplace becomes after cleaning
//!   $ dirmap clean "Kyiv, Ukrainian SSR, USSR"
//!
//! - Build `<user>.json` from a title list (needs a TMDB key)
//!   $ TMDB_API_KEY=... dirmap --user blessedheart enrich --input films.txt
//!
//! Status lines go to stdout, logs to stderr (`RUST_LOG=debug` for more).
mod args;

use crate::args::{CliArgs, Commands, InputArgs};
use anyhow::{bail, Context};
use clap::Parser;
use dirmap_core::aggregate::aggregate;
use dirmap_core::enrich::{enrich_titles, read_titles, TmdbClient};
use dirmap_core::geocode::nominatim::{DEFAULT_DELAY, DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};
use dirmap_core::loader::common_io::data_file_name;
use dirmap_core::pipeline::{require_user, StatusEvent};
use dirmap_core::render::write_outputs;
use dirmap_core::{
    AppConfig, DataSource, DirSource, HttpSource, LoadedData, NominatimGeocoder, Pipeline,
};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };
    apply_overrides(&mut config, &args.input);

    match args.command {
        Commands::Plot { out, style, fit } => {
            if let Some(style) = style {
                config.map.style = style.into();
            }
            config.map.fit_bounds |= fit;
            plot(&config, &out)?;
        }

        Commands::Groups => groups(&config)?,

        Commands::Clean { birthplace } => {
            let cleaned = config.normalizer()?.clean(&birthplace);
            if cleaned.is_empty() {
                println!("(empty: this location would be skipped)");
            } else {
                println!("{cleaned}");
            }
        }

        Commands::Enrich {
            input,
            output,
            api_key,
        } => enrich(&config, &input, output, api_key)?,
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Command-line flags win over the config file.
fn apply_overrides(config: &mut AppConfig, input: &InputArgs) {
    if let Some(user) = &input.user {
        config.input.user = Some(user.clone());
    }
    if let Some(dir) = &input.data_dir {
        config.input.data_dir = Some(dir.clone());
    }
    if let Some(url) = &input.base_url {
        config.input.base_url = Some(url.clone());
    }
    if let Some(format) = input.format {
        config.input.format = format.into();
    }
}

fn data_dir(config: &AppConfig) -> PathBuf {
    config
        .input
        .data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."))
}

fn data_source(config: &AppConfig) -> anyhow::Result<Box<dyn DataSource>> {
    let format = config.input.format;
    Ok(match &config.input.base_url {
        Some(url) => Box::new(HttpSource::new(url, format)?),
        None => Box::new(DirSource::new(data_dir(config), format)),
    })
}

fn plot(config: &AppConfig, out: &Path) -> anyhow::Result<()> {
    let user = require_user(config.input.user.as_deref())?;
    let source = data_source(config)?;

    let geocoder = NominatimGeocoder::with_options(
        config.geocoder.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT),
        config
            .geocoder
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT),
        config.geocoder.delay().unwrap_or(DEFAULT_DELAY),
    )?;
    let mut pipeline = Pipeline::new(geocoder)
        .with_normalizer(config.normalizer()?)
        .with_style(config.map.style);

    let mut session = config.map.session();
    let mut reporter = |event: &StatusEvent<'_>| println!("{event}");

    pipeline.run(Some(user), &*source, &mut session, &mut reporter)?;

    if config.map.fit_bounds {
        session.fit_bounds();
    }
    let files = write_outputs(&session, user, out)?;
    println!("Map:       {}", files.html.display());
    println!("GeoJSON:   {}", files.geojson.display());
    println!("Locations: {}", files.prepared.display());
    Ok(())
}

fn groups(config: &AppConfig) -> anyhow::Result<()> {
    let user = require_user(config.input.user.as_deref())?;
    let records = match data_source(config)?.fetch(user)? {
        LoadedData::Films(records) => records,
        LoadedData::Prepared(prepared) => {
            println!(
                "{} prepared locations; they are plotted as they are.",
                prepared.len()
            );
            return Ok(());
        }
    };

    let normalizer = config.normalizer()?;
    let locations = aggregate(&records)?;
    for (label, group) in locations.iter() {
        let query = normalizer.clean(label);
        if query.is_empty() {
            println!("{label}  (skipped: nothing left after cleaning)");
        } else {
            println!("{label}  ->  {query}");
        }
        let names: Vec<&str> = group.directors.iter().map(|d| d.name.as_str()).collect();
        println!("    {}", names.join(", "));
    }
    println!("{} locations", locations.len());
    Ok(())
}

fn enrich(
    config: &AppConfig,
    input: &Path,
    output: Option<PathBuf>,
    api_key: Option<String>,
) -> anyhow::Result<()> {
    let api_key = api_key
        .or_else(|| config.tmdb.api_key.clone())
        .context("TMDB API key not found. Pass --api-key or set TMDB_API_KEY.")?;
    let output = match output {
        Some(path) => path,
        None => {
            let user = require_user(config.input.user.as_deref())?;
            data_dir(config).join(data_file_name(user))
        }
    };

    let file = File::open(input)
        .with_context(|| format!("could not open title list {}", input.display()))?;
    let titles = read_titles(BufReader::new(file))?;
    if titles.is_empty() {
        bail!("{} contains no film titles", input.display());
    }

    let mut client = TmdbClient::new(&api_key)?;
    let report = enrich_titles(
        &titles,
        &mut client,
        Duration::from_millis(config.tmdb.delay_ms),
    );

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, serde_json::to_string_pretty(&report.records)?)?;

    for title in &report.failed {
        warn!(title = %title, "no complete record");
    }
    info!(path = %output.display(), "data file written");
    println!(
        "Saved {} of {} films to {}",
        report.records.len(),
        titles.len(),
        output.display()
    );
    Ok(())
}
