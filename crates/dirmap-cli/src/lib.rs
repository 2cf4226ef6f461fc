//! dirmap-cli
//! ==========
//!
//! Command-line interface for `dirmap-core`: plot where the directors of a
//! film list were born.
//!
//! This crate provides a binary (`dirmap`). The library target only carries
//! this overview for rendered docs.
//!
//! Quick start
//! -----------
//!
//! ```text
//! dirmap --help
//! dirmap --user blessedheart --data-dir data plot --out maps
//! dirmap --user blessedheart groups
//! dirmap clean "[2] Munich, Bavaria, West Germany"
//! ```
//!
//! Settings can also come from a TOML file passed with `--config`; see
//! `dirmap_core::config::AppConfig` for the sections. Flags override the
//! file.
//!
//! For programmatic access, use the `dirmap-core` crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
