//! dirmap-wasm: WebAssembly bindings for dirmap-core
//!
//! The browser side of the director map. The page fetches `<user>.json`
//! and talks to the geocoder itself; this module does the deterministic
//! part in between.
//!
//! What it provides
//! ----------------
//! - Panic hook on module load (via `#[wasm_bindgen(start)]`)
//! - `clean_birthplace(raw)`: the geocoder query for a raw birthplace
//! - `radius_for_zoom(zoom)`: circle radius in meters for a zoom level
//! - `group_locations(json)`: birthplace groups with query and popup
//! - `plot_markers(json, coordinates, zoom, pins)`: markers plus the
//!   director index, given coordinates keyed by query
//!
//! Quick start (browser)
//! ---------------------
//! ```javascript
//! import init, { group_locations, plot_markers } from 'dirmap-wasm';
//!
//! async function main() {
//!   await init();
//!   const json = await (await fetch('blessedheart.json')).text();
//!   const coords = {};
//!   for (const g of group_locations(json)) {
//!     if (g.query) coords[g.query] = await geocode(g.query); // { lat, lon }
//!   }
//!   const { markers, directors } = plot_markers(json, coords, map.getZoom(), false);
//! }
//! ```
use dirmap_core::aggregate::aggregate;
use dirmap_core::loader::parse_records;
use dirmap_core::pipeline::{NullReporter, Pipeline};
use dirmap_core::plot::popup_html;
use dirmap_core::session::{DirectorIndexEntry, MapMarker, DEFAULT_CENTER};
use dirmap_core::{Candidate, MapError, MapSession, MarkerStyle, PipelineStats};
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"Initializing dirmap WASM module...".into());
}

/* --------------------------------------------------------------------------
   Plain helpers
-------------------------------------------------------------------------- */

#[wasm_bindgen]
pub fn clean_birthplace(raw: &str) -> String {
    dirmap_core::clean_birthplace(raw)
}

#[wasm_bindgen]
pub fn radius_for_zoom(zoom: f64) -> f64 {
    dirmap_core::plot::radius_for_zoom(zoom)
}

/* --------------------------------------------------------------------------
   Grouping
-------------------------------------------------------------------------- */

#[derive(Debug, Serialize)]
struct GroupView {
    label: String,
    /// Empty when the location would be skipped.
    query: String,
    directors: Vec<String>,
    popup_html: String,
}

fn build_groups(json: &str) -> dirmap_core::Result<Vec<GroupView>> {
    let records = parse_records(json.as_bytes())?;
    let locations = aggregate(&records)?;
    Ok(locations
        .iter()
        .map(|(label, group)| GroupView {
            label: label.to_owned(),
            query: dirmap_core::clean_birthplace(label),
            directors: group.directors.iter().map(|d| d.name.clone()).collect(),
            popup_html: popup_html(label, group),
        })
        .collect())
}

#[wasm_bindgen]
pub fn group_locations(json: &str) -> Result<JsValue, JsValue> {
    let groups = build_groups(json).map_err(to_js_error)?;
    Ok(to_value(&groups)?)
}

/* --------------------------------------------------------------------------
   Marker building
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, Deserialize)]
struct Coordinate {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Serialize)]
struct PlotView {
    markers: Vec<MapMarker>,
    directors: Vec<DirectorIndexEntry>,
    stats: PipelineStats,
}

fn build_plot(
    json: &str,
    coordinates: &HashMap<String, Coordinate>,
    zoom: f64,
    pins: bool,
) -> dirmap_core::Result<PlotView> {
    let records = parse_records(json.as_bytes())?;
    let mut geocoder = |query: &str| -> dirmap_core::Result<Vec<Candidate>> {
        Ok(coordinates
            .get(query)
            .map(|c| vec![Candidate { x: c.lon, y: c.lat }])
            .unwrap_or_default())
    };
    let style = if pins {
        MarkerStyle::Pin
    } else {
        MarkerStyle::Circle
    };

    let mut session = MapSession::new(DEFAULT_CENTER, zoom);
    let stats = Pipeline::new(&mut geocoder)
        .with_style(style)
        .run_records(&records, &mut session, &mut NullReporter)?;

    Ok(PlotView {
        markers: session.markers().iter().cloned().collect(),
        directors: session.director_index(),
        stats,
    })
}

/// `coordinates` maps a cleaned query to `{ lat, lon }`; queries without an
/// entry count as not found.
#[wasm_bindgen]
pub fn plot_markers(
    json: &str,
    coordinates: JsValue,
    zoom: f64,
    pins: bool,
) -> Result<JsValue, JsValue> {
    let coordinates: HashMap<String, Coordinate> = from_value(coordinates)?;
    let view = build_plot(json, &coordinates, zoom, pins).map_err(to_js_error)?;
    Ok(to_value(&view)?)
}

fn to_js_error(e: MapError) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}
