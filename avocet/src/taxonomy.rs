//! Species taxonomy access through the single-slot snapshot cache.

use std::sync::Arc;

use avocet_core::types::SpeciesTaxon;
use avocet_core::AvocetError;

use crate::core::{Avocet, tag_err};

impl Avocet {
    /// The species taxonomy snapshot, fetched at most once per TTL.
    ///
    /// Concurrent callers share one download; an expired snapshot is
    /// served as a degraded fallback when the refresh fails.
    ///
    /// # Errors
    /// `Unsupported` without a taxonomy connector; otherwise the fetch
    /// failure when no snapshot exists to fall back on.
    pub async fn taxonomy(&self) -> Result<Arc<Vec<SpeciesTaxon>>, AvocetError> {
        let (name, provider) = self.taxonomy_provider()?;
        self.taxonomy_cache
            .get_or_fetch(|| async {
                Self::provider_call_with_timeout(
                    name,
                    "taxonomy",
                    self.cfg.call_timeout,
                    provider.taxonomy(),
                )
                .await
                .map_err(|e| tag_err(name, e))
            })
            .await
    }

    /// Drop the cached snapshot and fetch a fresh one.
    ///
    /// # Errors
    /// Same as [`Avocet::taxonomy`], except there is no stale snapshot
    /// to fall back on after the clear.
    pub async fn refresh_taxonomy(&self) -> Result<Arc<Vec<SpeciesTaxon>>, AvocetError> {
        self.taxonomy_cache.clear().await;
        self.taxonomy().await
    }
}
