// crates/dirmap-core/src/common.rs
//! Small shared types used by the aggregator, the session and the pipeline.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Counters reported while a load runs.
///
/// They drive status text only; the pipeline never branches on them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Unique raw birthplaces after aggregation.
    pub total: usize,
    /// Locations attempted so far (cleaned-empty ones included).
    pub processed: usize,
    /// Locations that produced a marker.
    pub plotted: usize,
}

/// A string-keyed map that iterates in first-insertion order.
///
/// Director and location maps both depend on discovery order, which a plain
/// `HashMap` does not keep.
#[derive(Debug, Clone, Serialize)]
pub struct InsertionMap<V> {
    entries: Vec<(String, V)>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl<V> Default for InsertionMap<V> {
    fn default() -> Self {
        InsertionMap {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> InsertionMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, inserting `make()` at the end first if
    /// the key has not been seen yet.
    pub fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> V) -> &mut V {
        let pos = match self.index.get(key) {
            Some(&pos) => pos,
            None => {
                self.entries.push((key.to_owned(), make()));
                let pos = self.entries.len() - 1;
                self.index.insert(key.to_owned(), pos);
                pos
            }
        };
        &mut self.entries[pos].1
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V> IntoIterator for InsertionMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
