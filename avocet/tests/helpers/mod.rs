#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use avocet_core::connector::{
    AvocetConnector, DiscoveryProvider, GeocodingProvider, ObservationsProvider, TaxonomyProvider,
    WeatherProvider,
};
use avocet_core::types::{
    Hotspot, HotspotId, Location, Observation, SpeciesTaxon, WeatherConditions,
};
use avocet_core::{AvocetError, PacingConfig};
use avocet_mock::MockConnector;

pub const ORIGIN: Location = Location::new(42.44, -76.50);

/// Pacing that keeps tests fast and emits progress every 2 items.
pub fn quick_pacing() -> PacingConfig {
    PacingConfig {
        min_call_interval: Duration::ZERO,
        emit_every: 2,
    }
}

pub fn params() -> avocet_core::SearchParams {
    avocet_core::SearchParams {
        origin: ORIGIN,
        radius_km: 25.0,
        max_results: 30,
        back_days: 14,
        sort_by: avocet_core::SortBy::Species,
    }
}

/// Wraps the fixture connector and counts calls per capability.
pub struct CountingConnector {
    inner: MockConnector,
    pub observation_calls: AtomicUsize,
    pub reverse_calls: AtomicUsize,
    pub weather_calls: AtomicUsize,
    pub taxonomy_calls: AtomicUsize,
}

impl CountingConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MockConnector::new(),
            observation_calls: AtomicUsize::new(0),
            reverse_calls: AtomicUsize::new(0),
            weather_calls: AtomicUsize::new(0),
            taxonomy_calls: AtomicUsize::new(0),
        })
    }
}

impl AvocetConnector for CountingConnector {
    fn name(&self) -> &'static str {
        "counting"
    }
    fn as_discovery_provider(&self) -> Option<&dyn DiscoveryProvider> {
        Some(self)
    }
    fn as_observations_provider(&self) -> Option<&dyn ObservationsProvider> {
        Some(self)
    }
    fn as_taxonomy_provider(&self) -> Option<&dyn TaxonomyProvider> {
        Some(self)
    }
    fn as_geocoding_provider(&self) -> Option<&dyn GeocodingProvider> {
        Some(self)
    }
    fn as_weather_provider(&self) -> Option<&dyn WeatherProvider> {
        Some(self)
    }
}

#[async_trait]
impl DiscoveryProvider for CountingConnector {
    async fn nearby_hotspots(
        &self,
        origin: Location,
        radius_km: f64,
        back_days: u32,
    ) -> Result<Vec<Hotspot>, AvocetError> {
        self.inner
            .as_discovery_provider()
            .ok_or_else(|| AvocetError::unsupported("discovery"))?
            .nearby_hotspots(origin, radius_km, back_days)
            .await
    }
}

#[async_trait]
impl ObservationsProvider for CountingConnector {
    async fn recent_observations(
        &self,
        hotspot: &HotspotId,
        back_days: u32,
    ) -> Result<Vec<Observation>, AvocetError> {
        self.observation_calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .as_observations_provider()
            .ok_or_else(|| AvocetError::unsupported("observations"))?
            .recent_observations(hotspot, back_days)
            .await
    }
}

#[async_trait]
impl TaxonomyProvider for CountingConnector {
    async fn taxonomy(&self) -> Result<Vec<SpeciesTaxon>, AvocetError> {
        self.taxonomy_calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .as_taxonomy_provider()
            .ok_or_else(|| AvocetError::unsupported("taxonomy"))?
            .taxonomy()
            .await
    }
}

#[async_trait]
impl GeocodingProvider for CountingConnector {
    async fn forward(
        &self,
        address: &str,
    ) -> Result<avocet_core::types::GeocodedPlace, AvocetError> {
        self.inner
            .as_geocoding_provider()
            .ok_or_else(|| AvocetError::unsupported("geocoding"))?
            .forward(address)
            .await
    }

    async fn reverse(&self, location: Location) -> Result<String, AvocetError> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .as_geocoding_provider()
            .ok_or_else(|| AvocetError::unsupported("geocoding"))?
            .reverse(location)
            .await
    }
}

#[async_trait]
impl WeatherProvider for CountingConnector {
    async fn current_conditions(
        &self,
        location: Location,
    ) -> Result<WeatherConditions, AvocetError> {
        self.weather_calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .as_weather_provider()
            .ok_or_else(|| AvocetError::unsupported("weather"))?
            .current_conditions(location)
            .await
    }
}

/// Advertises discovery only; used to exercise missing-capability paths.
pub struct DiscoveryOnly;

impl AvocetConnector for DiscoveryOnly {
    fn name(&self) -> &'static str {
        "discovery-only"
    }
    fn as_discovery_provider(&self) -> Option<&dyn DiscoveryProvider> {
        Some(self)
    }
}

#[async_trait]
impl DiscoveryProvider for DiscoveryOnly {
    async fn nearby_hotspots(
        &self,
        origin: Location,
        radius_km: f64,
        back_days: u32,
    ) -> Result<Vec<Hotspot>, AvocetError> {
        MockConnector::new()
            .as_discovery_provider()
            .ok_or_else(|| AvocetError::unsupported("discovery"))?
            .nearby_hotspots(origin, radius_km, back_days)
            .await
    }
}

/// Discovery that always fails, alongside working observations.
pub struct FailingDiscovery;

impl AvocetConnector for FailingDiscovery {
    fn name(&self) -> &'static str {
        "failing-discovery"
    }
    fn as_discovery_provider(&self) -> Option<&dyn DiscoveryProvider> {
        Some(self)
    }
    fn as_observations_provider(&self) -> Option<&dyn ObservationsProvider> {
        Some(self)
    }
}

#[async_trait]
impl DiscoveryProvider for FailingDiscovery {
    async fn nearby_hotspots(
        &self,
        _origin: Location,
        _radius_km: f64,
        _back_days: u32,
    ) -> Result<Vec<Hotspot>, AvocetError> {
        Err(AvocetError::connector(
            "failing-discovery",
            "upstream unavailable",
        ))
    }
}

#[async_trait]
impl ObservationsProvider for FailingDiscovery {
    async fn recent_observations(
        &self,
        _hotspot: &HotspotId,
        _back_days: u32,
    ) -> Result<Vec<Observation>, AvocetError> {
        Ok(vec![])
    }
}
