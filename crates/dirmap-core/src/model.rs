// crates/dirmap-core/src/model.rs
use crate::common::InsertionMap;
use serde::{Deserialize, Serialize};

/// A film title as carried through aggregation. `None` when the record had
/// no `film_title`; such entries are kept, not dropped.
pub type FilmTitle = Option<String>;

/// Everything known about one director after the first pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectorAggregate {
    /// First birthplace observed for this director.
    pub birthplace: String,
    /// Titles in encounter order.
    pub films: Vec<FilmTitle>,
}

/// Director name → aggregate, in first-appearance order.
pub type DirectorMap = InsertionMap<DirectorAggregate>;

/// A director entry inside a location group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectorFilms {
    pub name: String,
    pub films: Vec<FilmTitle>,
}

impl DirectorFilms {
    /// Titles sorted ascending, missing titles last.
    pub fn sorted_films(&self) -> Vec<FilmTitle> {
        let mut films = self.films.clone();
        films.sort_by(|a, b| match (a, b) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        films
    }
}

/// All directors born at one raw birthplace string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationAggregate {
    pub directors: Vec<DirectorFilms>,
}

/// Raw birthplace → directors, in discovery order.
pub type LocationMap = InsertionMap<LocationAggregate>;

/// A location the geocoder resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedLocation {
    /// The uncleaned birthplace, used as popup heading.
    pub raw_label: String,
    pub lat: f64,
    pub lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_titles_sort_last() {
        let d = DirectorFilms {
            name: "A".into(),
            films: vec![Some("b".into()), None, Some("a".into())],
        };
        assert_eq!(
            d.sorted_films(),
            vec![Some("a".to_string()), Some("b".to_string()), None]
        );
    }
}
