use std::sync::Arc;

use avocet_cache::{GeocodeCache, TaxonomyCache, WeatherCache, geocode_cache, weather_cache};
use avocet_core::connector::{
    DiscoveryProvider, GeocodingProvider, ObservationsProvider, RoutingProvider, TaxonomyProvider,
    WeatherProvider,
};
use avocet_core::{AvocetConfig, AvocetConnector, AvocetError, PacingConfig};

/// Orchestrator that drives discovery, enrichment, caching, and trip
/// planning across registered connectors.
///
/// The shared caches are the only state that crosses search invocations;
/// everything else is owned per call.
pub struct Avocet {
    pub(crate) connectors: Vec<Arc<dyn AvocetConnector>>,
    pub(crate) cfg: AvocetConfig,
    pub(crate) geocode_cache: GeocodeCache,
    pub(crate) taxonomy_cache: TaxonomyCache,
    pub(crate) weather_cache: WeatherCache,
}

impl std::fmt::Debug for Avocet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Avocet").finish_non_exhaustive()
    }
}

/// Builder for constructing an `Avocet` orchestrator.
pub struct AvocetBuilder {
    connectors: Vec<Arc<dyn AvocetConnector>>,
    cfg: AvocetConfig,
}

impl Default for AvocetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AvocetBuilder {
    /// Create a builder with default pacing (~5 calls/s), cache TTLs
    /// (geocode 6 h, taxonomy 7 d, weather 30 min), and a 10 s per-call
    /// timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connectors: vec![],
            cfg: AvocetConfig::default(),
        }
    }

    /// Register a connector.
    ///
    /// Capability lookup walks connectors in registration order and uses
    /// the first one advertising the capability, so a vendor registered
    /// earlier wins for the capabilities it shares with later ones.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn AvocetConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Override the enrichment pacing policy.
    #[must_use]
    pub const fn pacing(mut self, pacing: PacingConfig) -> Self {
        self.cfg.pacing = pacing;
        self
    }

    /// Override the per-network-call timeout.
    #[must_use]
    pub const fn call_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.cfg.call_timeout = timeout;
        self
    }

    /// Override cache TTLs and capacities.
    #[must_use]
    pub const fn cache(mut self, cache: avocet_core::CacheConfig) -> Self {
        self.cfg.cache = cache;
        self
    }

    /// Build the orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` when no registered connector advertises
    /// hotspot discovery: without a base list there is nothing to enrich.
    pub fn build(self) -> Result<Avocet, AvocetError> {
        if !self
            .connectors
            .iter()
            .any(|c| c.as_discovery_provider().is_some())
        {
            return Err(AvocetError::InvalidArg(
                "no discovery-capable connector registered; add one via with_connector(...)"
                    .to_string(),
            ));
        }
        let geocode_cache = geocode_cache(&self.cfg.cache);
        let weather_cache = weather_cache(&self.cfg.cache);
        let taxonomy_cache = TaxonomyCache::new(&self.cfg.cache);
        Ok(Avocet {
            connectors: self.connectors,
            cfg: self.cfg,
            geocode_cache,
            taxonomy_cache,
            weather_cache,
        })
    }
}

impl Avocet {
    /// Start building a new `Avocet` instance.
    #[must_use]
    pub fn builder() -> AvocetBuilder {
        AvocetBuilder::new()
    }

    /// Wrap a provider future with a timeout and standardized timeout
    /// error mapping.
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: &'static str,
        timeout: std::time::Duration,
        fut: Fut,
    ) -> Result<T, AvocetError>
    where
        Fut: Future<Output = Result<T, AvocetError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(AvocetError::provider_timeout(connector_name, capability)))
    }

    pub(crate) fn discovery(
        &self,
    ) -> Result<(&'static str, &dyn DiscoveryProvider), AvocetError> {
        self.connectors
            .iter()
            .find_map(|c| c.as_discovery_provider().map(|p| (c.name(), p)))
            .ok_or_else(|| AvocetError::unsupported("discovery"))
    }

    pub(crate) fn observations(
        &self,
    ) -> Result<(&'static str, &dyn ObservationsProvider), AvocetError> {
        self.connectors
            .iter()
            .find_map(|c| c.as_observations_provider().map(|p| (c.name(), p)))
            .ok_or_else(|| AvocetError::unsupported("observations"))
    }

    pub(crate) fn taxonomy_provider(
        &self,
    ) -> Result<(&'static str, &dyn TaxonomyProvider), AvocetError> {
        self.connectors
            .iter()
            .find_map(|c| c.as_taxonomy_provider().map(|p| (c.name(), p)))
            .ok_or_else(|| AvocetError::unsupported("taxonomy"))
    }

    pub(crate) fn geocoding(
        &self,
    ) -> Result<(&'static str, &dyn GeocodingProvider), AvocetError> {
        self.connectors
            .iter()
            .find_map(|c| c.as_geocoding_provider().map(|p| (c.name(), p)))
            .ok_or_else(|| AvocetError::unsupported("geocoding"))
    }

    pub(crate) fn routing(&self) -> Result<(&'static str, &dyn RoutingProvider), AvocetError> {
        self.connectors
            .iter()
            .find_map(|c| c.as_routing_provider().map(|p| (c.name(), p)))
            .ok_or_else(|| AvocetError::unsupported("routing"))
    }

    pub(crate) fn weather(&self) -> Result<(&'static str, &dyn WeatherProvider), AvocetError> {
        self.connectors
            .iter()
            .find_map(|c| c.as_weather_provider().map(|p| (c.name(), p)))
            .ok_or_else(|| AvocetError::unsupported("weather"))
    }
}

pub(crate) fn tag_err(connector: &str, e: AvocetError) -> AvocetError {
    match e {
        e @ (AvocetError::NotFound { .. }
        | AvocetError::ProviderTimeout { .. }
        | AvocetError::Connector { .. }
        | AvocetError::OrderMismatch { .. }
        | AvocetError::Unsupported { .. }
        | AvocetError::InvalidArg(_)
        | AvocetError::NoWeatherData) => e,
        other => AvocetError::Connector {
            connector: connector.to_string(),
            msg: other.to_string(),
        },
    }
}
