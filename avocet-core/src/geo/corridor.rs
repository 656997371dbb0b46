use crate::geo::distance::haversine_km;
use crate::types::Location;

/// Corridor-membership test for a candidate stop along a driving route.
///
/// Returns `true` iff
/// `d(start, candidate) + d(candidate, end) <= d(start, end) + 2 * max_detour_km`,
/// where `d` is great-circle distance. The 2x factor accounts for the
/// detour being a there-and-back deviation from the direct path.
///
/// This is a straight-line approximation of the extra driving a stop
/// would add, applied as a cheap pre-filter before any routed trip
/// computation; it is intentionally not a routed-distance test.
#[must_use]
pub fn within_corridor(
    start: Location,
    end: Location,
    candidate: Location,
    max_detour_km: f64,
) -> bool {
    let direct = haversine_km(start, end);
    let via = haversine_km(start, candidate) + haversine_km(candidate, end);
    via <= direct + 2.0 * max_detour_km
}
