//! Avocet orchestrates hotspot discovery and enrichment across multiple
//! birding data providers.
//!
//! Overview
//! - Discovers hotspots near a point through connectors implementing the
//!   `avocet_core` contracts, then enriches each one with recent
//!   observations under a pacing policy.
//! - Streams progressive, complete-shaped snapshots while enrichment
//!   runs, so a consumer can render the base list immediately and refine
//!   it as patches land.
//! - Isolates per-item failures: a hotspot whose enrichment fails stays
//!   in the result with its enrichment fields unset.
//! - Serves reverse geocoding, weather, and the species taxonomy through
//!   staleness-aware caches with stale-fallback on refresh failure.
//! - Plans multi-stop trips with a straight-line corridor pre-filter and
//!   reconciles the provider's optimized visiting order.
//!
//! Key behaviors and trade-offs
//! - Pacing: enrichment calls are spaced by a fixed minimum interval;
//!   slower completion in exchange for staying inside provider rate
//!   limits without per-vendor budget bookkeeping.
//! - Snapshots: intermediate emissions are dropped when the consumer
//!   lags; the base and final snapshots are always delivered. Order is
//!   fixed at base fetch and sorting is the caller's explicit step.
//! - Caching: expired entries are retained and served as a degraded
//!   fallback when a refresh fails, trading bounded staleness for
//!   availability.
//!
//! Examples
//! Building an orchestrator and running a search:
//! ```rust,ignore
//! use std::sync::Arc;
//! use avocet::{Avocet, Phase};
//! use avocet_core::{Location, SearchParams, SortBy};
//!
//! let ebird = Arc::new(EbirdConnector::new("api-token"));
//! let osrm = Arc::new(OsrmConnector::new_default());
//!
//! let avocet = Avocet::builder()
//!     .with_connector(ebird)
//!     .with_connector(osrm)
//!     .build()?;
//!
//! let (handle, mut rx) = avocet
//!     .search(SearchParams {
//!         origin: Location::new(42.44, -76.50),
//!         radius_km: 25.0,
//!         max_results: 30,
//!         back_days: 14,
//!         sort_by: SortBy::Species,
//!     })
//!     .await?;
//! while let Some(snapshot) = rx.recv().await {
//!     // render; snapshot.phase == Phase::Done on the last one
//! }
//! ```
//!
//! Sorting a finished snapshot:
//! ```rust,ignore
//! use avocet::sorted;
//! use avocet_core::SortBy;
//! let ordered = sorted(done_snapshot.hotspots, SortBy::Distance);
//! ```
//!
//! Planning a trip over the best hotspots:
//! ```rust,ignore
//! let stops: Vec<_> = ordered.iter().take(5).map(|h| h.location).collect();
//! let trip = avocet
//!     .plan_trip(origin, &stops, Some(destination), false, Some(10.0))
//!     .await?;
//! ```
//!
//! See `avocet/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

mod batcher;
pub(crate) mod core;
mod geocode;
mod pipeline;
mod sort;
mod taxonomy;
mod trip;
mod weather;

pub use batcher::{BatchFailure, BatchOutcome, RateLimitedBatcher};
pub use crate::core::{Avocet, AvocetBuilder};
pub use pipeline::{Phase, PipelineHandle, Snapshot};
pub use sort::sorted;
pub use trip::{PlannedTrip, reconcile_trip_order};
pub use weather::{birding_score, summarize};

// Re-export core types for convenience
pub use avocet_core::{
    AvocetConfig,
    AvocetConnector,
    AvocetError,
    BirdingRating,
    CacheConfig,
    ConnectorKey,
    GeocodedPlace,
    Hotspot,
    HotspotId,
    Location,
    LocationKey,
    Observation,
    OptimizedTrip,
    PacingConfig,
    Route,
    RouteLeg,
    SearchParams,
    SortBy,
    SpeciesTaxon,
    WeatherConditions,
    WeatherSummary,
};
