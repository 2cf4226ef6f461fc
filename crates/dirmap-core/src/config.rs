// crates/dirmap-core/src/config.rs
use crate::error::{MapError, Result};
use crate::loader::InputFormat;
use crate::plot::MarkerStyle;
use crate::session::{MapSession, TileLayer, DEFAULT_CENTER, DEFAULT_ZOOM};
use crate::text::{CleanupRule, LocationNormalizer};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings read from a TOML file. Every section and field is optional.
///
/// ```toml
/// [input]
/// user = "blessedheart"
/// data_dir = "data"
///
/// [geocoder]
/// delay_ms = 1500
///
/// [map]
/// style = "pin"
///
/// [map.tiles]
/// url_template = "https://tile.opentopomap.org/{z}/{x}/{y}.png"
/// attribution = "OpenTopoMap"
///
/// [[normalize.extra_rules]]
/// pattern = "Czechoslovakia"
/// replacement = "Czech Republic"
/// literal = true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub geocoder: GeocoderConfig,
    pub map: MapConfig,
    pub normalize: NormalizeConfig,
    pub tmdb: TmdbConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub user: Option<String>,
    pub data_dir: Option<PathBuf>,
    /// When set, `<base_url>/<user>.json` is fetched over HTTP instead.
    pub base_url: Option<String>,
    pub format: InputFormat,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: Option<String>,
    pub user_agent: Option<String>,
    pub delay_ms: Option<u64>,
}

impl GeocoderConfig {
    pub fn delay(&self) -> Option<Duration> {
        self.delay_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub style: MarkerStyle,
    pub zoom: f64,
    /// `[lat, lon]`
    pub center: [f64; 2],
    /// Zoom to the plotted markers once the load is complete.
    pub fit_bounds: bool,
    /// OpenStreetMap tiles when unset.
    pub tiles: Option<TileLayer>,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            style: MarkerStyle::Circle,
            zoom: DEFAULT_ZOOM,
            center: [DEFAULT_CENTER.0, DEFAULT_CENTER.1],
            fit_bounds: false,
            tiles: None,
        }
    }
}

impl MapConfig {
    /// An empty session with this view and tile layer.
    pub fn session(&self) -> MapSession {
        let [lat, lon] = self.center;
        let session = MapSession::new((lat, lon), self.zoom);
        match &self.tiles {
            Some(tiles) => session.with_tile_layer(tiles.clone()),
            None => session,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Appended after the built-in rules, in file order.
    pub extra_rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
    /// Match `pattern` as plain text instead of a regular expression.
    #[serde(default)]
    pub literal: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    pub api_key: Option<String>,
    pub delay_ms: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        TmdbConfig {
            api_key: None,
            delay_ms: 500,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MapError::Configuration(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Default normalizer plus the configured extra rules.
    pub fn normalizer(&self) -> Result<LocationNormalizer> {
        self.normalize
            .extra_rules
            .iter()
            .try_fold(LocationNormalizer::default(), |n, rule| {
                let rule = if rule.literal {
                    CleanupRule::literal(&rule.pattern, &rule.replacement)
                } else {
                    CleanupRule::pattern(&rule.pattern, &rule.replacement)?
                };
                Ok(n.with_rule(rule))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert!(cfg.input.user.is_none());
        assert_eq!(cfg.input.format, InputFormat::Films);
        assert_eq!(cfg.map.style, MarkerStyle::Circle);
        assert_eq!(cfg.map.zoom, 2.0);
        assert_eq!(cfg.tmdb.delay_ms, 500);
        assert_eq!(cfg.map.session().tile_layer(), &TileLayer::default());
    }

    #[test]
    fn tiles_section_replaces_the_default_layer() {
        let cfg = AppConfig::from_toml(
            r#"
            [map]
            zoom = 4.0
            center = [48.0, 11.0]

            [map.tiles]
            url_template = "https://tile.opentopomap.org/{z}/{x}/{y}.png"
            "#,
        )
        .unwrap();
        let session = cfg.map.session();
        assert_eq!(session.center(), (48.0, 11.0));
        assert_eq!(session.zoom(), 4.0);
        assert_eq!(
            session.tile_layer().url_template,
            "https://tile.opentopomap.org/{z}/{x}/{y}.png"
        );
        assert_eq!(session.tile_layer().attribution, "");
    }

    #[test]
    fn parses_sections_and_rules() {
        let cfg = AppConfig::from_toml(
            r#"
            [input]
            user = "blessedheart"
            format = "prepared"

            [geocoder]
            delay_ms = 1500

            [map]
            style = "pin"
            center = [48.0, 11.0]

            [[normalize.extra_rules]]
            pattern = "Czechoslovakia"
            replacement = "Czech Republic"
            literal = true

            [[normalize.extra_rules]]
            pattern = '\s*\(.*?\)'
            "#,
        )
        .unwrap();
        assert_eq!(cfg.input.user.as_deref(), Some("blessedheart"));
        assert_eq!(cfg.input.format, InputFormat::Prepared);
        assert_eq!(cfg.geocoder.delay(), Some(Duration::from_millis(1500)));
        assert_eq!(cfg.map.style, MarkerStyle::Pin);
        assert_eq!(cfg.map.center, [48.0, 11.0]);

        let n = cfg.normalizer().unwrap();
        assert_eq!(n.clean("Brno (Moravia), Czechoslovakia"), "Brno, Czech Republic");
    }

    #[test]
    fn bad_pattern_is_an_error() {
        let cfg = AppConfig::from_toml(
            r#"
            [[normalize.extra_rules]]
            pattern = "("
            "#,
        )
        .unwrap();
        assert!(matches!(cfg.normalizer(), Err(MapError::Pattern(_))));
    }

    #[test]
    fn unknown_style_is_rejected() {
        assert!(matches!(
            AppConfig::from_toml("[map]\nstyle = \"hexagon\""),
            Err(MapError::Toml(_))
        ));
    }
}
