//! Geocoding operations over the registered geocoding connector, with
//! reverse lookups served through the shared cache.

use avocet_core::types::GeocodedPlace;
use avocet_core::{AvocetError, Location, LocationKey, dedupe};
use tracing::warn;

use crate::batcher::RateLimitedBatcher;
use crate::core::{Avocet, tag_err};

impl Avocet {
    /// Resolve a free-form address to coordinates.
    ///
    /// Forward lookups are not cached; callers resolve an address once
    /// per session and the result feeds a search origin, not a hot loop.
    ///
    /// # Errors
    /// `Unsupported` without a geocoding connector; otherwise the
    /// provider's failure, tagged with the connector name.
    pub async fn forward_geocode(&self, address: &str) -> Result<GeocodedPlace, AvocetError> {
        let (name, geo) = self.geocoding()?;
        Self::provider_call_with_timeout(
            name,
            "geocoding/forward",
            self.cfg.call_timeout,
            geo.forward(address),
        )
        .await
        .map_err(|e| tag_err(name, e))
    }

    /// Resolve coordinates to a display address, through the geocode
    /// cache.
    ///
    /// # Errors
    /// `Unsupported` without a geocoding connector; otherwise the fetch
    /// failure when the cache holds no fallback for this location.
    pub async fn reverse_geocode(&self, location: Location) -> Result<String, AvocetError> {
        let (name, geo) = self.geocoding()?;
        let key = LocationKey::for_location(location);
        self.geocode_cache
            .get_or_fetch(key, || async {
                Self::provider_call_with_timeout(
                    name,
                    "geocoding/reverse",
                    self.cfg.call_timeout,
                    geo.reverse(location),
                )
                .await
                .map_err(|e| tag_err(name, e))
            })
            .await
    }

    /// Reverse-geocode a batch of coordinates.
    ///
    /// Duplicate coordinates are collapsed before any network call, so N
    /// inputs at the same place cost one lookup; results are mapped back
    /// to input positions. Lookups run under the enrichment pacing
    /// policy, and a failed lookup leaves `None` at its positions rather
    /// than failing the batch.
    ///
    /// # Errors
    /// `Unsupported` without a geocoding connector.
    pub async fn reverse_geocode_batch(
        &self,
        locations: &[Location],
    ) -> Result<Vec<Option<String>>, AvocetError> {
        let _ = self.geocoding()?;

        let deduped = dedupe(locations);
        let batcher = RateLimitedBatcher::new(self.cfg.pacing);
        let (_, never_cancelled) = tokio::sync::watch::channel(false);

        let outcome = batcher
            .run(
                &deduped.unique,
                &never_cancelled,
                |_, &loc| self.reverse_geocode(loc),
                |_, _, _| {},
            )
            .await;

        for failure in &outcome.failures {
            warn!(
                index = failure.index,
                error = %failure.error,
                "reverse geocode failed; positions left unresolved"
            );
        }

        Ok(deduped
            .index_of
            .iter()
            .map(|&i| outcome.patches[i].clone())
            .collect())
    }
}
