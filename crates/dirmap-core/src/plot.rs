// crates/dirmap-core/src/plot.rs

//! Marker plotting rules: popup content and the zoom → radius step function.

use crate::model::LocationAggregate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// How a location is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
    /// A circle with a radius in meters that follows the zoom level.
    #[default]
    Circle,
    /// A fixed-size pin; zoom changes do not affect it.
    Pin,
}

/// Circle radius in meters for a zoom level.
///
/// Coarse zooms get large circles so single cities stay visible on a world
/// view.
pub fn radius_for_zoom(zoom: f64) -> f64 {
    if zoom <= 4.0 {
        150_000.0
    } else if zoom <= 6.0 {
        50_000.0
    } else if zoom <= 9.0 {
        10_000.0
    } else {
        1_500.0
    }
}

/// Popup HTML for one location: the raw birthplace as heading, then each
/// director in encounter order with their films sorted ascending.
///
/// Missing titles render as "(untitled)". All text is HTML-escaped.
pub fn popup_html(raw_label: &str, location: &LocationAggregate) -> String {
    let mut out = String::new();
    let _ = write!(out, "<h3>{}</h3><hr>", escape_html(raw_label));
    for director in &location.directors {
        let _ = write!(out, "<h4>{}</h4><ul>", escape_html(&director.name));
        for film in director.sorted_films() {
            let title = film.as_deref().unwrap_or("(untitled)");
            let _ = write!(out, "<li>{}</li>", escape_html(title));
        }
        out.push_str("</ul>");
    }
    out
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
