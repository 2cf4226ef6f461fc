// crates/dirmap-core/src/render.rs

//! Turns a plotted [`MapSession`] into files: a GeoJSON feature collection,
//! the pre-aggregated location list, and a standalone Leaflet page.

use crate::error::Result;
use crate::plot::escape_html;
use crate::raw::PreparedLocation;
use crate::session::MapSession;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// GeoJSON `FeatureCollection`, one `Point` per marker.
pub fn to_geojson(session: &MapSession) -> Value {
    let features: Vec<Value> = session
        .markers()
        .iter()
        .map(|m| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [m.location.lon, m.location.lat],
                },
                "properties": {
                    "label": m.location.raw_label,
                    "directors": m.directors,
                    "popup_html": m.popup_html,
                    "style": m.style,
                    "radius": m.radius,
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// The pre-aggregated contract, loadable again with
/// [`InputFormat::Prepared`](crate::loader::InputFormat::Prepared).
pub fn to_prepared(session: &MapSession) -> Vec<PreparedLocation> {
    session
        .markers()
        .iter()
        .map(|m| PreparedLocation {
            lat: m.location.lat,
            lon: m.location.lon,
            popup_html: m.popup_html.clone(),
            directors: m.directors.clone(),
        })
        .collect()
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
  html, body { margin: 0; height: 100%; font-family: sans-serif; }
  #map { position: absolute; top: 0; bottom: 0; left: 0; right: 260px; }
  #index { position: absolute; top: 0; bottom: 0; right: 0; width: 260px; overflow-y: auto; border-left: 1px solid #ccc; }
  #index h2 { font-size: 1em; margin: 8px; }
  #index li { cursor: pointer; padding: 2px 8px; list-style: none; }
  #index li:hover { background: #eef; }
  #index ul { padding: 0; margin: 0; }
  #title-overlay { position: absolute; top: 10px; left: 60px; z-index: 1000; background: #fff; padding: 4px 10px; border-radius: 4px; }
</style>
</head>
<body>
<div id="map"></div>
<div id="title-overlay">{{HEADING}}</div>
<div id="index"><h2>Directors</h2><ul id="director-list"></ul></div>
<script>
const markers = {{MARKERS}};
const directors = {{DIRECTORS}};
const tiles = {{TILES}};
const map = L.map('map').setView({{CENTER}}, {{ZOOM}});
L.tileLayer(tiles.url_template, { attribution: tiles.attribution }).addTo(map);

function getRadiusForZoom(z) {
  if (z <= 4) return 150000;
  if (z <= 6) return 50000;
  if (z <= 9) return 10000;
  return 1500;
}

const circles = [];
const byId = {};
markers.forEach(m => {
  let layer;
  if (m.style === 'circle') {
    layer = L.circle([m.location.lat, m.location.lon], {
      radius: getRadiusForZoom(map.getZoom()), fillColor: '#3388ff', fillOpacity: 0.5, weight: 1, color: '#004C99'
    });
    circles.push(layer);
  } else {
    layer = L.marker([m.location.lat, m.location.lon]);
  }
  layer.bindPopup(m.popup_html).addTo(map);
  byId[m.id] = layer;
});

map.on('zoomend', () => {
  const r = getRadiusForZoom(map.getZoom());
  circles.forEach(c => c.setRadius(r));
});

const list = document.getElementById('director-list');
directors.forEach(d => {
  const li = document.createElement('li');
  li.textContent = d.name;
  li.addEventListener('click', () => {
    map.flyTo([d.lat, d.lon], 8);
    const layer = byId[d.marker];
    if (layer) { map.once('moveend', () => layer.openPopup()); }
  });
  list.appendChild(li);
});
</script>
</body>
</html>
"#;

/// A self-contained Leaflet page for the session, titled after `user`.
///
/// The page replays the session: same markers and popups, the zoom → radius
/// rule on `zoomend`, and a director list that flies to a birthplace.
pub fn render_html(session: &MapSession, user: &str) -> Result<String> {
    let markers: Vec<_> = session.markers().iter().collect();
    let (lat, lon) = session.center();

    let mut values = HashMap::new();
    values.insert("TITLE", escape_html(&format!("{user}'s Director Map")));
    values.insert(
        "HEADING",
        escape_html(&format!("Map of {user}'s Director Birthplaces")),
    );
    values.insert("MARKERS", script_json(&markers)?);
    values.insert("DIRECTORS", script_json(&session.director_index())?);
    values.insert("TILES", script_json(session.tile_layer())?);
    values.insert("CENTER", format!("[{lat}, {lon}]"));
    values.insert("ZOOM", session.zoom().to_string());

    Ok(fill_template(PAGE_TEMPLATE, &values))
}

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([A-Z]+)\}\}").expect("placeholder pattern"));

/// Replaces every `{{NAME}}` in one scan over the template. Substituted text
/// is never scanned again; unknown names are left as they are.
fn fill_template(template: &str, values: &HashMap<&str, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match values.get(&caps[1]) {
            Some(v) => v.clone(),
            None => caps[0].to_owned(),
        })
        .into_owned()
}

/// JSON safe to embed in a `<script>` block.
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Paths written by [`write_outputs`].
#[derive(Debug, Clone)]
pub struct OutputFiles {
    pub html: PathBuf,
    pub geojson: PathBuf,
    pub prepared: PathBuf,
}

/// Writes `<user>.html`, `<user>.geojson` and `<user>.locations.json` into
/// `out_dir`, creating it if needed.
pub fn write_outputs(session: &MapSession, user: &str, out_dir: &Path) -> Result<OutputFiles> {
    fs::create_dir_all(out_dir)?;
    let files = OutputFiles {
        html: out_dir.join(format!("{user}.html")),
        geojson: out_dir.join(format!("{user}.geojson")),
        prepared: out_dir.join(format!("{user}.locations.json")),
    };

    fs::write(&files.html, render_html(session, user)?)?;
    fs::write(&files.geojson, serde_json::to_string_pretty(&to_geojson(session))?)?;
    fs::write(&files.prepared, serde_json::to_string_pretty(&to_prepared(session))?)?;

    info!(
        markers = session.markers().len(),
        dir = %out_dir.display(),
        "map written"
    );
    Ok(files)
}
