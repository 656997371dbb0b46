//! Configuration types shared across the orchestrator and connectors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Pacing policy for rate-limited batch enrichment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Minimum delay between consecutive enrichment calls.
    pub min_call_interval: Duration,
    /// Number of completed items between progress emissions.
    pub emit_every: usize,
}

impl Default for PacingConfig {
    fn default() -> Self {
        // ~5 calls/second, progress after every 5 completed items.
        Self {
            min_call_interval: Duration::from_millis(200),
            emit_every: 5,
        }
    }
}

/// TTL and capacity settings for the shared cache stores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL for reverse-geocode entries.
    pub geocode_ttl: Duration,
    /// TTL for the bulk taxonomy snapshot.
    pub taxonomy_ttl: Duration,
    /// TTL for per-location weather samples.
    pub weather_ttl: Duration,
    /// Maximum entries per keyed store.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            geocode_ttl: Duration::from_secs(6 * 60 * 60),
            taxonomy_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            weather_ttl: Duration::from_secs(30 * 60),
            max_entries: 4096,
        }
    }
}

/// Global configuration for the `Avocet` orchestrator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AvocetConfig {
    /// Pacing policy for batched enrichment calls.
    pub pacing: PacingConfig,
    /// Cache TTLs and capacities.
    pub cache: CacheConfig,
    /// Per-network-call timeout. A timeout is an ordinary per-item
    /// failure, not a batch abort.
    pub call_timeout: Duration,
}

impl Default for AvocetConfig {
    fn default() -> Self {
        Self {
            pacing: PacingConfig::default(),
            cache: CacheConfig::default(),
            call_timeout: Duration::from_secs(10),
        }
    }
}
