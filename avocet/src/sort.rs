//! Explicit result ordering over a finished snapshot.
//!
//! Sorting never happens inside the pipeline: hotspot order is fixed at
//! base fetch so progressive snapshots stay positionally stable. The
//! caller applies an order here, once, when it has the snapshot it wants.

use std::cmp::Ordering;

use avocet_core::types::{Hotspot, SortBy};

/// Return `hotspots` reordered by `sort_by`.
///
/// - `Species`: most recent distinct species first; unenriched items
///   sort last, keeping their relative order.
/// - `Distance`: closest to the search origin first.
/// - `DriveTime`: shortest driving duration first; items without a
///   routed leg fall back to straight-line distance and sort after any
///   routed item.
///
/// The sort is stable, so ties keep discovery order.
#[must_use]
pub fn sorted(mut hotspots: Vec<Hotspot>, sort_by: SortBy) -> Vec<Hotspot> {
    match sort_by {
        SortBy::Species => {
            hotspots.sort_by(|a, b| match (a.recent_species_count, b.recent_species_count) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }
        SortBy::Distance => {
            hotspots.sort_by(|a, b| total_cmp(a.origin_distance_km, b.origin_distance_km));
        }
        SortBy::DriveTime => {
            hotspots.sort_by(|a, b| {
                match (a.route_leg.as_ref(), b.route_leg.as_ref()) {
                    (Some(x), Some(y)) => total_cmp(x.duration_seconds, y.duration_seconds),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => total_cmp(a.origin_distance_km, b.origin_distance_km),
                }
            });
        }
    }
    hotspots
}

fn total_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
