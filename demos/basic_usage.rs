//! Basic usage example for dirmap-rs
//!
//! This example demonstrates how to:
//! - Clean raw birthplace strings
//! - Run the load pipeline over in-memory film records
//! - Watch circle radii follow the zoom level
//! - Write the Leaflet page and GeoJSON
//!
//! It uses a small fixed coordinate table instead of a live geocoder, so it
//! runs offline.

use dirmap_core::prelude::*;
use dirmap_core::render::write_outputs;

fn main() -> Result<()> {
    println!("=== dirmap-rs Basic Usage Example ===\n");

    // Example 1: Birthplace cleaning
    println!("--- Example 1: Clean birthplaces ---");
    for raw in [
        "[1] London",
        "Munich, Bavaria, West Germany",
        "Kyiv, Ukrainian SSR, USSR",
        "[unknown]",
    ] {
        println!("{raw:?} -> {:?}", dirmap_core::clean_birthplace(raw));
    }
    println!();

    // Example 2: Aggregate, geocode and plot
    println!("--- Example 2: Plot directors by birthplace ---");
    let records = vec![
        Some(FilmRecord::new("Agnès Varda", "Ixelles, Belgium", "Cléo from 5 to 7")),
        Some(FilmRecord::new("Agnès Varda", "Ixelles, Belgium", "Vagabond")),
        Some(FilmRecord::new("Chantal Akerman", "Brussels, Belgium", "Jeanne Dielman")),
        Some(FilmRecord::new("Andrei Tarkovsky", "Zavrazhye, USSR", "Stalker")),
        None,
        Some(FilmRecord::new("Luis Buñuel", "[2] Calanda, Spain", "Viridiana")),
    ];

    let mut geocoder = |query: &str| -> Result<Vec<Candidate>> {
        let hit = match query {
            "Ixelles, Belgium" => Some((50.83, 4.37)),
            "Brussels, Belgium" => Some((50.85, 4.35)),
            "Calanda, Spain" => Some((40.94, -0.23)),
            _ => None,
        };
        Ok(hit
            .map(|(lat, lon)| vec![Candidate { x: lon, y: lat }])
            .unwrap_or_default())
    };

    let mut session = MapSession::default();
    let mut reporter = |event: &StatusEvent<'_>| println!("  {event}");
    let stats = Pipeline::new(&mut geocoder).run_records(&records, &mut session, &mut reporter)?;
    println!(
        "Plotted {} of {} locations ({} processed)\n",
        stats.plotted, stats.total, stats.processed
    );

    // Example 3: Zoom changes resize circle markers
    println!("--- Example 3: Zoom and radius ---");
    for zoom in [3.0, 6.0, 8.0, 11.0] {
        session.set_zoom(zoom);
        let radius = session.markers().iter().next().and_then(|m| m.radius);
        println!("zoom {zoom:>4}: radius {radius:?} m");
    }
    println!();

    // Example 4: Director index
    println!("--- Example 4: Director index ---");
    for entry in session.director_index() {
        println!("{} -> ({:.2}, {:.2})", entry.name, entry.lat, entry.lon);
    }
    println!();

    // Example 5: Write the map
    println!("--- Example 5: Write outputs ---");
    session.fit_bounds();
    let out_dir = std::env::temp_dir().join("dirmap-demo");
    let files = write_outputs(&session, "demo", &out_dir)?;
    println!("Open {} in a browser.", files.html.display());

    Ok(())
}
