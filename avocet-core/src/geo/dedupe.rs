use std::collections::HashMap;

use crate::geo::key::LocationKey;
use crate::types::Location;

/// Result of collapsing a location list to canonical unique entries.
#[derive(Debug, Clone)]
pub struct Dedup {
    /// Unique locations, ordered by first occurrence.
    pub unique: Vec<Location>,
    /// For each original index, the index of its canonical entry in `unique`.
    pub index_of: Vec<usize>,
}

/// Collapse a list of locations into canonical unique entries plus an
/// index mapping back to original positions.
///
/// Uniqueness is keyed by [`LocationKey`], so coordinates within key
/// resolution collapse to one entry. Order-preserving: the first
/// occurrence of each key determines its position in `unique`. Run before
/// any network call so N duplicate inputs cost one call.
#[must_use]
pub fn dedupe(locations: &[Location]) -> Dedup {
    let mut unique = Vec::new();
    let mut index_of = Vec::with_capacity(locations.len());
    let mut seen: HashMap<LocationKey, usize> = HashMap::new();

    for &loc in locations {
        let key = LocationKey::for_location(loc);
        let idx = *seen.entry(key).or_insert_with(|| {
            unique.push(loc);
            unique.len() - 1
        });
        index_of.push(idx);
    }

    Dedup { unique, index_of }
}
