//! Routing operations: two-point routes, per-hotspot driving legs,
//! reconciliation of an externally optimized trip order against the
//! original waypoint list, and the corridor-filtered trip planner.

use avocet_core::types::RouteLeg;
use avocet_core::{AvocetError, Hotspot, Location, OptimizedTrip, Route, within_corridor};
use tracing::{debug, warn};

use crate::batcher::RateLimitedBatcher;
use crate::core::{Avocet, tag_err};

/// Reorder `waypoints` to match an externally computed visiting order.
///
/// The order uses trip node indices: origin = 0, waypoints = 1..=n, and
/// an open trip's fixed destination = n+1. Round trips repeat the origin
/// index at the end. The origin and destination are excluded from the
/// output.
///
/// # Errors
/// Returns `OrderMismatch` when the order's shape is inconsistent with
/// the request: wrong length, missing or misplaced origin/destination for
/// the `round_trip` flag, an out-of-range index, or a repeated waypoint.
/// The inconsistency is surfaced, never reinterpreted.
pub fn reconcile_trip_order(
    waypoints: &[Location],
    order: &[usize],
    round_trip: bool,
    has_destination: bool,
) -> Result<Vec<Location>, AvocetError> {
    if round_trip && has_destination {
        return Err(AvocetError::InvalidArg(
            "a round trip cannot also carry a fixed destination".to_string(),
        ));
    }

    let n = waypoints.len();
    let node_count = 1 + n + usize::from(has_destination);
    let expected_len = node_count + usize::from(round_trip);
    if order.len() != expected_len {
        return Err(AvocetError::order_mismatch(format!(
            "expected {expected_len} indices for {n} waypoints, got {}",
            order.len()
        )));
    }

    match order.first() {
        Some(0) => {}
        other => {
            return Err(AvocetError::order_mismatch(format!(
                "order must start at the origin (index 0), got {other:?}"
            )));
        }
    }
    if round_trip && order.last() != Some(&0) {
        return Err(AvocetError::order_mismatch(
            "round trip order must return to the origin (index 0)".to_string(),
        ));
    }
    if has_destination && order.last() != Some(&(node_count - 1)) {
        return Err(AvocetError::order_mismatch(format!(
            "open trip order must end at the destination (index {})",
            node_count - 1
        )));
    }

    // Interior of the order: every waypoint index exactly once.
    let interior = &order[1..order.len() - usize::from(round_trip || has_destination)];
    let mut seen = vec![false; n];
    let mut out = Vec::with_capacity(n);
    for &idx in interior {
        if idx == 0 || idx > n {
            return Err(AvocetError::order_mismatch(format!(
                "waypoint index {idx} out of range 1..={n}"
            )));
        }
        if seen[idx - 1] {
            return Err(AvocetError::order_mismatch(format!(
                "waypoint index {idx} appears more than once"
            )));
        }
        seen[idx - 1] = true;
        out.push(waypoints[idx - 1]);
    }
    if out.len() != n {
        return Err(AvocetError::order_mismatch(format!(
            "order visits {} of {n} waypoints",
            out.len()
        )));
    }

    Ok(out)
}

/// A planned multi-stop trip.
#[derive(Debug, Clone)]
pub struct PlannedTrip {
    /// Stops in optimized visiting order, origin and destination excluded.
    pub stops: Vec<Location>,
    /// Candidate stops rejected by the corridor pre-filter.
    pub skipped: Vec<Location>,
    /// Total driving distance in meters.
    pub distance_meters: f64,
    /// Total driving duration in seconds.
    pub duration_seconds: f64,
    /// Encoded trip geometry.
    pub geometry: String,
}

impl Avocet {
    /// Compute a two-point driving route.
    ///
    /// # Errors
    /// `Unsupported` when no routing connector is registered; otherwise
    /// the routing provider's failure, tagged with the connector name.
    pub async fn route(&self, start: Location, end: Location) -> Result<Route, AvocetError> {
        let (name, routing) = self.routing()?;
        Self::provider_call_with_timeout(
            name,
            "routing/route",
            self.cfg.call_timeout,
            routing.route(start, end),
        )
        .await
        .map_err(|e| tag_err(name, e))
    }

    /// Attach a driving leg from `origin` to each hotspot, in place.
    ///
    /// The routing enrichment that feeds a drive-time ordering: lookups
    /// run under the enrichment pacing policy, a failed lookup leaves
    /// that hotspot's leg unset rather than failing the batch, and a
    /// hotspot already carrying a leg is skipped. Returns the number of
    /// legs attached.
    ///
    /// # Errors
    /// `Unsupported` when no routing connector is registered.
    pub async fn enrich_route_legs(
        &self,
        origin: Location,
        hotspots: &mut [Hotspot],
    ) -> Result<usize, AvocetError> {
        let _ = self.routing()?;

        let pending: Vec<usize> = hotspots
            .iter()
            .enumerate()
            .filter(|(_, h)| h.route_leg.is_none())
            .map(|(i, _)| i)
            .collect();
        let targets: Vec<Location> = pending.iter().map(|&i| hotspots[i].location).collect();

        let batcher = RateLimitedBatcher::new(self.cfg.pacing);
        let (_, never_cancelled) = tokio::sync::watch::channel(false);

        let outcome = batcher
            .run(
                &targets,
                &never_cancelled,
                |_, &loc| self.route(origin, loc),
                |_, _, _| {},
            )
            .await;

        for failure in &outcome.failures {
            warn!(
                index = failure.index,
                error = %failure.error,
                "route leg lookup failed; hotspot left unrouted"
            );
        }

        let mut attached = 0;
        for (&slot, patch) in pending.iter().zip(outcome.patches) {
            if let Some(route) = patch {
                hotspots[slot].route_leg = Some(RouteLeg {
                    start: origin,
                    end: hotspots[slot].location,
                    distance_meters: route.distance_meters,
                    duration_seconds: route.duration_seconds,
                });
                attached += 1;
            }
        }
        Ok(attached)
    }

    /// Plan an optimized multi-stop trip.
    ///
    /// When the trip has a distinct start and end (`destination` set and
    /// not a round trip), candidates outside the detour corridor are
    /// dropped before the routing call; the straight-line corridor test
    /// is a cheap pre-filter, not a routed-distance check. The external
    /// service's optimized order is then reconciled against the surviving
    /// waypoints; a malformed order is a data-integrity error, surfaced
    /// as `OrderMismatch`.
    ///
    /// # Errors
    /// `InvalidArg` when every candidate was filtered out or the request
    /// shape is contradictory; `Unsupported` without a routing connector;
    /// `OrderMismatch` for an inconsistent external order; otherwise the
    /// provider's failure.
    pub async fn plan_trip(
        &self,
        origin: Location,
        candidates: &[Location],
        destination: Option<Location>,
        round_trip: bool,
        max_detour_km: Option<f64>,
    ) -> Result<PlannedTrip, AvocetError> {
        let (name, routing) = self.routing()?;
        if round_trip && destination.is_some() {
            return Err(AvocetError::InvalidArg(
                "a round trip cannot also carry a fixed destination".to_string(),
            ));
        }

        let (waypoints, skipped): (Vec<Location>, Vec<Location>) = match (destination, max_detour_km)
        {
            (Some(dest), Some(budget)) if !round_trip => candidates
                .iter()
                .copied()
                .partition(|&c| within_corridor(origin, dest, c, budget)),
            _ => (candidates.to_vec(), Vec::new()),
        };
        if waypoints.is_empty() {
            return Err(AvocetError::InvalidArg(
                "no candidate stops remain within the detour corridor".to_string(),
            ));
        }
        if !skipped.is_empty() {
            debug!(
                kept = waypoints.len(),
                skipped = skipped.len(),
                "corridor pre-filter applied"
            );
        }

        let trip: OptimizedTrip = Self::provider_call_with_timeout(
            name,
            "routing/trip",
            self.cfg.call_timeout,
            routing.optimized_trip(origin, &waypoints, destination, round_trip),
        )
        .await
        .map_err(|e| tag_err(name, e))?;

        let stops = reconcile_trip_order(
            &waypoints,
            &trip.optimized_order,
            round_trip,
            destination.is_some(),
        )?;

        Ok(PlannedTrip {
            stops,
            skipped,
            distance_meters: trip.distance_meters,
            duration_seconds: trip.duration_seconds,
            geometry: trip.geometry,
        })
    }
}
