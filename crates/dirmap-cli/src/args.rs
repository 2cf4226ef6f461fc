use clap::{Args, Parser, Subcommand, ValueEnum};
use dirmap_core::{InputFormat, MarkerStyle};
use std::path::PathBuf;

/// CLI arguments for dirmap
#[derive(Debug, Parser)]
#[command(
    name = "dirmap",
    version,
    about = "Map where the directors of a film list were born"
)]
pub struct CliArgs {
    /// Optional TOML config file; flags override its values
    #[arg(short = 'c', long = "config", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub input: InputArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Username; the data file is `<user>.json`
    #[arg(short = 'u', long = "user", global = true)]
    pub user: Option<String>,

    /// Directory holding `<user>.json` (default: current directory)
    #[arg(short = 'd', long = "data-dir", global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Fetch `<base-url>/<user>.json` over HTTP instead of reading a directory
    #[arg(long = "base-url", global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Data file contract
    #[arg(long = "format", global = true, value_enum)]
    pub format: Option<FormatArg>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Geocode every birthplace and write the map files
    Plot {
        /// Output directory for `<user>.html`, `.geojson` and `.locations.json`
        #[arg(short = 'o', long = "out", default_value = ".", value_name = "DIR")]
        out: PathBuf,

        /// Marker style
        #[arg(long = "style", value_enum)]
        style: Option<StyleArg>,

        /// Zoom to the plotted markers instead of the configured view
        #[arg(long = "fit")]
        fit: bool,
    },

    /// List the birthplace groups and their geocoder queries, without geocoding
    Groups,

    /// Show what a birthplace string becomes after cleaning
    Clean {
        /// Raw birthplace, e.g. "Kyiv, Ukrainian SSR, USSR"
        birthplace: String,
    },

    /// Build `<user>.json` from a list of film titles using TMDB
    Enrich {
        /// Text file with one film title per line
        #[arg(short = 'i', long = "input", value_name = "FILE")]
        input: PathBuf,

        /// Output file (default: `<data-dir>/<user>.json`)
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,

        /// TMDB API key
        #[arg(long = "api-key", env = "TMDB_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Films,
    Prepared,
}

impl From<FormatArg> for InputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Films => InputFormat::Films,
            FormatArg::Prepared => InputFormat::Prepared,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StyleArg {
    Circle,
    Pin,
}

impl From<StyleArg> for MarkerStyle {
    fn from(s: StyleArg) -> Self {
        match s {
            StyleArg::Circle => MarkerStyle::Circle,
            StyleArg::Pin => MarkerStyle::Pin,
        }
    }
}
