//! avocet-core
//!
//! Core types, traits, and utilities shared across the avocet ecosystem.
//!
//! - `types`: common data structures (hotspots, observations, routes, weather).
//! - `connector`: the `AvocetConnector` trait and capability provider traits.
//! - `geo`: location keys, great-circle distance, corridor tests, dedup.
//! - `config`: pacing, cache, and timeout configuration.
//!
//! Async runtime (Tokio)
//! ---------------------
//! This crate assumes the Tokio ecosystem as the async runtime. The
//! pipeline handle utilities in `stream` wrap `tokio::task::JoinHandle<()>`
//! and use `tokio::sync::watch` for cooperative cancellation, so code that
//! drives enrichment must run under a Tokio 1.x runtime.
#![warn(missing_docs)]

/// Connector capability traits and the primary `AvocetConnector` interface.
pub mod connector;
/// Pacing, cache, and timeout configuration types.
pub mod config;
mod error;
/// Geographic primitives: keys, distance, corridor, dedup.
pub mod geo;
/// Task-handle utilities used by the pipeline handle and tests.
pub mod stream;
/// Common data structures.
pub mod types;

pub use connector::{
    AvocetConnector, ConnectorKey, DiscoveryProvider, GeocodingProvider, ObservationsProvider,
    RoutingProvider, TaxonomyProvider, WeatherProvider,
};
pub use config::{AvocetConfig, CacheConfig, PacingConfig};
pub use error::AvocetError;
pub use geo::{Dedup, LocationKey, dedupe, haversine_km, within_corridor};
pub use types::*;
