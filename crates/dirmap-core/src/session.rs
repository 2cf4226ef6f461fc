// crates/dirmap-core/src/session.rs

//! # Map Session
//!
//! Owns the map view state and the [`MarkerRegistry`]. The plotting loop adds
//! markers through [`MapSession::add_marker`]; zoom changes go through
//! [`MapSession::set_zoom`], which hands the registry to every handler
//! registered with [`MapSession::on_zoom_changed`]. The circle-radius update
//! is one such handler, installed by [`MapSession::new`].

use crate::model::GeocodedLocation;
use crate::plot::{radius_for_zoom, MarkerStyle};
use crate::text::fold_key;
use serde::{Deserialize, Serialize};

pub type MarkerId = usize;

pub const DEFAULT_CENTER: (f64, f64) = (20.0, 0.0);
pub const DEFAULT_ZOOM: f64 = 2.0;
const MAX_FIT_ZOOM: f64 = 12.0;

/// Tile source shown under the markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    /// Leaflet URL template, `{s}`/`{z}`/`{x}`/`{y}` placeholders included.
    pub url_template: String,
    #[serde(default)]
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        TileLayer {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".into(),
        }
    }
}

/// A plotted location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: MarkerId,
    pub location: GeocodedLocation,
    pub popup_html: String,
    /// Directors born here, in popup order.
    pub directors: Vec<String>,
    pub style: MarkerStyle,
    /// Radius in meters; `None` for pins.
    pub radius: Option<f64>,
}

/// Every marker currently on the map, in insertion order.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    markers: Vec<MapMarker>,
}

impl MarkerRegistry {
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MapMarker> {
        self.markers.iter()
    }

    pub fn get(&self, id: MarkerId) -> Option<&MapMarker> {
        self.markers.iter().find(|m| m.id == id)
    }

    /// Sets the radius of every circle marker. Pins are left alone.
    pub fn set_circle_radius(&mut self, radius: f64) {
        for marker in &mut self.markers {
            if marker.style == MarkerStyle::Circle {
                marker.radius = Some(radius);
            }
        }
    }

    fn push(&mut self, marker: MapMarker) {
        self.markers.push(marker);
    }

    fn remove(&mut self, id: MarkerId) -> Option<MapMarker> {
        let pos = self.markers.iter().position(|m| m.id == id)?;
        Some(self.markers.remove(pos))
    }
}

/// Called with the new zoom level and the registry after each zoom change.
pub type ZoomHandler = Box<dyn FnMut(f64, &mut MarkerRegistry)>;

/// Geographic bounding box of a set of markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn center(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}

/// One line of the director index: clicking it flies to `marker`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectorIndexEntry {
    pub name: String,
    pub marker: MarkerId,
    pub lat: f64,
    pub lon: f64,
}

/// The map view plus its markers.
pub struct MapSession {
    center: (f64, f64),
    zoom: f64,
    tiles: TileLayer,
    registry: MarkerRegistry,
    zoom_handlers: Vec<ZoomHandler>,
    next_id: MarkerId,
}

impl Default for MapSession {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}

impl MapSession {
    /// Creates a view at `center` (lat, lon) and `zoom` with the default
    /// OpenStreetMap tiles and the radius handler installed.
    pub fn new(center: (f64, f64), zoom: f64) -> Self {
        let mut session = MapSession {
            center,
            zoom,
            tiles: TileLayer::default(),
            registry: MarkerRegistry::default(),
            zoom_handlers: Vec::new(),
            next_id: 0,
        };
        session.on_zoom_changed(|zoom, registry| {
            registry.set_circle_radius(radius_for_zoom(zoom));
        });
        session
    }

    pub fn with_tile_layer(mut self, tiles: TileLayer) -> Self {
        self.tiles = tiles;
        self
    }

    pub fn tile_layer(&self) -> &TileLayer {
        &self.tiles
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn markers(&self) -> &MarkerRegistry {
        &self.registry
    }

    /// Registers a zoom-change observer. Handlers run in registration order.
    pub fn on_zoom_changed<F>(&mut self, handler: F)
    where
        F: FnMut(f64, &mut MarkerRegistry) + 'static,
    {
        self.zoom_handlers.push(Box::new(handler));
    }

    /// Changes the zoom level and notifies every handler. Setting the
    /// current level again is not a change.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom == self.zoom {
            return;
        }
        self.zoom = zoom;
        for handler in &mut self.zoom_handlers {
            handler(zoom, &mut self.registry);
        }
    }

    /// Adds a marker. Circle markers start with the radius of the current
    /// zoom level.
    pub fn add_marker(
        &mut self,
        location: GeocodedLocation,
        popup_html: String,
        directors: Vec<String>,
        style: MarkerStyle,
    ) -> MarkerId {
        let id = self.next_id;
        self.next_id += 1;
        let radius = match style {
            MarkerStyle::Circle => Some(radius_for_zoom(self.zoom)),
            MarkerStyle::Pin => None,
        };
        self.registry.push(MapMarker {
            id,
            location,
            popup_html,
            directors,
            style,
            radius,
        });
        id
    }

    pub fn remove_marker(&mut self, id: MarkerId) -> Option<MapMarker> {
        self.registry.remove(id)
    }

    /// Bounding box of all markers, `None` when there are none.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut iter = self.registry.iter().map(|m| &m.location);
        let first = iter.next()?;
        let init = Bounds {
            south: first.lat,
            west: first.lon,
            north: first.lat,
            east: first.lon,
        };
        Some(iter.fold(init, |b, loc| Bounds {
            south: b.south.min(loc.lat),
            west: b.west.min(loc.lon),
            north: b.north.max(loc.lat),
            east: b.east.max(loc.lon),
        }))
    }

    /// Centers the view on all markers and picks the largest zoom level whose
    /// 256px world tile still spans them. Fires zoom handlers like any other
    /// zoom change. Returns the bounds used.
    pub fn fit_bounds(&mut self) -> Option<Bounds> {
        let bounds = self.bounds()?;
        self.center = bounds.center();

        let lon_span = (bounds.east - bounds.west).max(1e-6);
        let lat_span = (bounds.north - bounds.south).max(1e-6);
        let span = lon_span.max(lat_span * 2.0);
        let zoom = (360.0 / span).log2().floor().clamp(1.0, MAX_FIT_ZOOM);
        self.set_zoom(zoom);
        Some(bounds)
    }

    /// All directors with the marker of their birthplace, sorted by name
    /// (accent- and case-insensitive).
    pub fn director_index(&self) -> Vec<DirectorIndexEntry> {
        let mut out: Vec<DirectorIndexEntry> = self
            .registry
            .iter()
            .flat_map(|m| {
                m.directors.iter().map(move |name| DirectorIndexEntry {
                    name: name.clone(),
                    marker: m.id,
                    lat: m.location.lat,
                    lon: m.location.lon,
                })
            })
            .collect();
        out.sort_by_cached_key(|e| fold_key(&e.name));
        out
    }
}
