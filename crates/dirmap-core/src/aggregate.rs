// crates/dirmap-core/src/aggregate.rs

//! # Director / Location Aggregation
//!
//! Two passes turn a flat list of film records into map groups:
//!
//! 1. [`aggregate_directors`]: director name → first-seen birthplace + films.
//! 2. [`group_by_location`]: raw birthplace → directors born there.
//!
//! Birthplaces are keyed by their *raw* string. Two spellings of the same
//! place ("London" / "London, UK") stay separate groups.

use crate::error::{MapError, Result};
use crate::model::{DirectorAggregate, DirectorFilms, DirectorMap, LocationAggregate, LocationMap};
use crate::raw::FilmRecord;
use tracing::debug;

/// First pass. Records without a director or a birthplace are skipped.
///
/// A director keeps the first birthplace seen; films from later records are
/// attached to that birthplace even if the record names another one.
pub fn aggregate_directors<'a, I>(records: I) -> DirectorMap
where
    I: IntoIterator<Item = &'a Option<FilmRecord>>,
{
    let mut directors = DirectorMap::new();

    for record in records.into_iter().flatten() {
        let (Some(name), Some(birthplace)) = (
            record.director_name.as_deref().filter(|s| !s.is_empty()),
            record.birthplace.as_deref().filter(|s| !s.is_empty()),
        ) else {
            continue;
        };

        let entry = directors.get_or_insert_with(name, || DirectorAggregate {
            birthplace: birthplace.to_owned(),
            films: Vec::new(),
        });
        if entry.birthplace != birthplace {
            debug!(
                director = name,
                kept = %entry.birthplace,
                ignored = birthplace,
                "conflicting birthplace ignored"
            );
        }
        entry.films.push(record.film_title.clone());
    }

    directors
}

/// Second pass. Iterates directors in first-appearance order, so the
/// location order is the order in which birthplaces are met *there*, not in
/// the raw input.
pub fn group_by_location(directors: DirectorMap) -> LocationMap {
    let mut locations = LocationMap::new();

    for (name, info) in directors {
        locations
            .get_or_insert_with(&info.birthplace, LocationAggregate::default)
            .directors
            .push(DirectorFilms {
                name,
                films: info.films,
            });
    }

    locations
}

/// Both passes, with the empty-data check the pipeline relies on.
///
/// Fails with [`MapError::Data`] when there are no records at all, or when
/// every record was skipped.
pub fn aggregate(records: &[Option<FilmRecord>]) -> Result<LocationMap> {
    if records.is_empty() {
        return Err(MapError::Data("Data file is empty.".into()));
    }

    let directors = aggregate_directors(records);
    debug!(directors = directors.len(), "directors aggregated");

    let locations = group_by_location(directors);
    if locations.is_empty() {
        return Err(MapError::Data(
            "Data file contains no usable film records.".into(),
        ));
    }
    Ok(locations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(d: &str, b: &str, t: &str) -> Option<FilmRecord> {
        Some(FilmRecord::new(d, b, t))
    }

    #[test]
    fn first_birthplace_wins() {
        let records = vec![
            rec("A", "Paris, France", "X"),
            rec("A", "Lyon, France", "Y"),
        ];
        let dirs = aggregate_directors(&records);
        let a = dirs.get("A").unwrap();
        assert_eq!(a.birthplace, "Paris, France");
        assert_eq!(a.films, vec![Some("X".into()), Some("Y".into())]);
    }

    #[test]
    fn skips_partial_and_null_records() {
        let records = vec![
            None,
            Some(FilmRecord {
                director_name: Some("A".into()),
                birthplace: None,
                film_title: Some("X".into()),
            }),
            Some(FilmRecord {
                director_name: None,
                birthplace: Some("Rome".into()),
                film_title: Some("Y".into()),
            }),
            Some(FilmRecord {
                director_name: Some("B".into()),
                birthplace: Some("Rome".into()),
                film_title: None,
            }),
        ];
        let locs = aggregate(&records).unwrap();
        assert_eq!(locs.len(), 1);
        let rome = locs.get("Rome").unwrap();
        assert_eq!(rome.directors[0].name, "B");
        assert_eq!(rome.directors[0].films, vec![None]);
    }

    #[test]
    fn location_order_follows_director_order() {
        // C joins Tokyo, which B introduced before A introduced Seoul.
        let records = vec![
            rec("B", "Tokyo", "1"),
            rec("A", "Seoul", "2"),
            rec("C", "Tokyo", "3"),
        ];
        let locs = aggregate(&records).unwrap();
        let keys: Vec<_> = locs.keys().collect();
        assert_eq!(keys, vec!["Tokyo", "Seoul"]);
        let names: Vec<_> = locs
            .get("Tokyo")
            .unwrap()
            .directors
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn each_director_lands_in_exactly_one_group() {
        let records = vec![
            rec("A", "Paris", "1"),
            rec("B", "Tokyo", "2"),
            rec("A", "Lyon", "3"),
            rec("C", "Lyon", "4"),
            rec("B", "Paris", "5"),
            rec("D", "Tokyo", "6"),
            rec("C", "Tokyo", "7"),
            rec("A", "Tokyo", "8"),
        ];
        let locs = aggregate(&records).unwrap();

        let mut counts = std::collections::HashMap::new();
        for (place, loc) in locs.iter() {
            for d in &loc.directors {
                *counts.entry(d.name.as_str()).or_insert(0) += 1;
                let first_seen = records
                    .iter()
                    .flatten()
                    .find(|r| r.director_name.as_deref() == Some(d.name.as_str()))
                    .and_then(|r| r.birthplace.as_deref());
                assert_eq!(first_seen, Some(place), "{} grouped under {place}", d.name);
            }
        }
        assert_eq!(counts.len(), 4);
        assert!(counts.values().all(|&n| n == 1), "{counts:?}");

        let a = &locs.get("Paris").unwrap().directors[0];
        assert_eq!(a.name, "A");
        assert_eq!(a.films.len(), 3);
        let keys: Vec<_> = locs.keys().collect();
        assert_eq!(keys, vec!["Paris", "Tokyo", "Lyon"]);
    }

    #[test]
    fn empty_input_is_data_error() {
        assert!(matches!(aggregate(&[]), Err(MapError::Data(_))));
        assert!(matches!(aggregate(&[None, None]), Err(MapError::Data(_))));
    }
}
