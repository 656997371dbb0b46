//! Typed cache fronts for the enrichment sources that benefit from reuse:
//! reverse geocoding (hours), the taxonomy snapshot (days), and weather
//! samples (minutes).

use std::sync::Arc;
use std::time::{Duration, Instant};

use avocet_core::types::{SpeciesTaxon, WeatherConditions};
use avocet_core::{AvocetError, CacheConfig, LocationKey};
use tokio::sync::Mutex;
use tracing::warn;

use crate::clock::{Clock, SystemClock};
use crate::store::TtlCache;

/// Reverse-geocode results keyed by normalized coordinates.
pub type GeocodeCache = TtlCache<LocationKey, String>;

/// Per-location weather samples keyed by normalized coordinates.
pub type WeatherCache = TtlCache<LocationKey, WeatherConditions>;

/// Build the geocode cache from config.
#[must_use]
pub fn geocode_cache(cfg: &CacheConfig) -> GeocodeCache {
    TtlCache::new(cfg.max_entries, cfg.geocode_ttl)
}

/// Build the weather cache from config.
#[must_use]
pub fn weather_cache(cfg: &CacheConfig) -> WeatherCache {
    TtlCache::new(cfg.max_entries, cfg.weather_ttl)
}

/// Single-slot cache for the bulk species-taxonomy snapshot.
///
/// The snapshot is large and refreshed rarely (TTL on the order of days),
/// so it gets a dedicated slot rather than a keyed store. `clear` drops
/// the slot so the next read refetches, which is how a forced refresh
/// supersedes cached data.
pub struct TaxonomyCache {
    slot: Mutex<Option<(Arc<Vec<SpeciesTaxon>>, Instant)>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TaxonomyCache {
    /// Build from config on the system clock.
    #[must_use]
    pub fn new(cfg: &CacheConfig) -> Self {
        Self::with_clock(cfg.taxonomy_ttl, Arc::new(SystemClock))
    }

    /// Build with an injected clock (tests).
    #[must_use]
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
            clock,
        }
    }

    /// Return the fresh snapshot, or fetch, store, and return.
    ///
    /// Holding the slot lock across the fetch means concurrent callers
    /// wait for one taxonomy download instead of issuing their own.
    ///
    /// # Errors
    /// Propagates the fetch error when no expired snapshot exists to
    /// serve as a degraded fallback.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Arc<Vec<SpeciesTaxon>>, AvocetError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<SpeciesTaxon>, AvocetError>>,
    {
        let mut slot = self.slot.lock().await;
        let now = self.clock.now();
        if let Some((snapshot, inserted_at)) = slot.as_ref()
            && now.duration_since(*inserted_at) < self.ttl
        {
            return Ok(Arc::clone(snapshot));
        }

        match fetch().await {
            Ok(rows) => {
                let snapshot = Arc::new(rows);
                *slot = Some((Arc::clone(&snapshot), now));
                Ok(snapshot)
            }
            Err(err) => {
                if let Some((stale, _)) = slot.as_ref() {
                    warn!(error = %err, "taxonomy refresh failed, serving stale snapshot");
                    Ok(Arc::clone(stale))
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Drop the snapshot so the next read refetches.
    pub async fn clear(&self) {
        *self.slot.lock().await = None;
    }
}
