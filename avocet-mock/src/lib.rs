//! Mock connector for CI-safe examples and orchestrator tests. Provides
//! deterministic data from static fixtures and advertises every
//! capability.

use async_trait::async_trait;
use avocet_core::connector::{
    AvocetConnector, DiscoveryProvider, GeocodingProvider, ObservationsProvider, RoutingProvider,
    TaxonomyProvider, WeatherProvider,
};
use avocet_core::types::{
    GeocodedPlace, Hotspot, HotspotId, Location, Observation, OptimizedTrip, Route, SpeciesTaxon,
    WeatherConditions,
};
use avocet_core::{AvocetError, haversine_km};

mod fixtures;

pub use fixtures::hotspots::{FLAKY_SITE_ID, SLOW_SITE_ID};

// Straight-line to driven distance, then a free-flow driving speed.
const ROAD_FACTOR: f64 = 1.3;
const DRIVE_SPEED_MPS: f64 = 15.0;

/// Deterministic mock connector.
///
/// Discovery returns a fixed set of sites offset from the requested
/// origin. The [`FLAKY_SITE_ID`] and [`SLOW_SITE_ID`] sentinels are
/// opt-in so the happy path stays failure-free by default.
pub struct MockConnector {
    include_flaky: bool,
    include_slow: bool,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            include_flaky: false,
            include_slow: false,
        }
    }

    /// Include a site whose observation lookups always fail.
    #[must_use]
    pub const fn with_flaky_site(mut self) -> Self {
        self.include_flaky = true;
        self
    }

    /// Include a site whose observation lookups stall for 200 ms.
    #[must_use]
    pub const fn with_slow_site(mut self) -> Self {
        self.include_slow = true;
        self
    }
}

impl AvocetConnector for MockConnector {
    fn name(&self) -> &'static str {
        "avocet-mock"
    }
    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_discovery_provider(&self) -> Option<&dyn DiscoveryProvider> {
        Some(self as &dyn DiscoveryProvider)
    }
    fn as_observations_provider(&self) -> Option<&dyn ObservationsProvider> {
        Some(self as &dyn ObservationsProvider)
    }
    fn as_taxonomy_provider(&self) -> Option<&dyn TaxonomyProvider> {
        Some(self as &dyn TaxonomyProvider)
    }
    fn as_geocoding_provider(&self) -> Option<&dyn GeocodingProvider> {
        Some(self as &dyn GeocodingProvider)
    }
    fn as_routing_provider(&self) -> Option<&dyn RoutingProvider> {
        Some(self as &dyn RoutingProvider)
    }
    fn as_weather_provider(&self) -> Option<&dyn WeatherProvider> {
        Some(self as &dyn WeatherProvider)
    }
}

#[async_trait]
impl DiscoveryProvider for MockConnector {
    async fn nearby_hotspots(
        &self,
        origin: Location,
        radius_km: f64,
        _back_days: u32,
    ) -> Result<Vec<Hotspot>, AvocetError> {
        let mut sites = fixtures::hotspots::near(origin, radius_km);
        if self.include_flaky {
            sites.push(fixtures::hotspots::sentinel(FLAKY_SITE_ID, origin));
        }
        if self.include_slow {
            sites.push(fixtures::hotspots::sentinel(SLOW_SITE_ID, origin));
        }
        Ok(sites)
    }
}

#[async_trait]
impl ObservationsProvider for MockConnector {
    async fn recent_observations(
        &self,
        hotspot: &HotspotId,
        _back_days: u32,
    ) -> Result<Vec<Observation>, AvocetError> {
        match hotspot.as_str() {
            FLAKY_SITE_ID => Err(AvocetError::connector(
                "avocet-mock",
                "forced failure: observations",
            )),
            SLOW_SITE_ID => {
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                Ok(vec![])
            }
            id => Ok(fixtures::observations::at(id)),
        }
    }
}

#[async_trait]
impl TaxonomyProvider for MockConnector {
    async fn taxonomy(&self) -> Result<Vec<SpeciesTaxon>, AvocetError> {
        Ok(fixtures::taxonomy::snapshot())
    }
}

#[async_trait]
impl GeocodingProvider for MockConnector {
    async fn forward(&self, address: &str) -> Result<GeocodedPlace, AvocetError> {
        match address {
            "Sapsucker Woods" => Ok(GeocodedPlace {
                location: Location::new(42.480, -76.451),
                display_address: "Sapsucker Woods Rd, Ithaca, NY, United States".to_string(),
            }),
            other => Err(AvocetError::not_found(format!("address: {other}"))),
        }
    }

    async fn reverse(&self, location: Location) -> Result<String, AvocetError> {
        Ok(format!(
            "Mockville, {:.2}, {:.2}",
            location.latitude, location.longitude
        ))
    }
}

#[async_trait]
impl RoutingProvider for MockConnector {
    async fn route(&self, start: Location, end: Location) -> Result<Route, AvocetError> {
        let distance_meters = haversine_km(start, end) * 1000.0 * ROAD_FACTOR;
        Ok(Route {
            distance_meters,
            duration_seconds: distance_meters / DRIVE_SPEED_MPS,
            geometry: "mock-polyline".to_string(),
        })
    }

    async fn optimized_trip(
        &self,
        origin: Location,
        waypoints: &[Location],
        destination: Option<Location>,
        round_trip: bool,
    ) -> Result<OptimizedTrip, AvocetError> {
        // Visits in the submitted order; no actual optimization.
        let n = waypoints.len();
        let mut optimized_order: Vec<usize> = (0..=n).collect();
        if destination.is_some() {
            optimized_order.push(n + 1);
        }
        if round_trip {
            optimized_order.push(0);
        }

        let mut nodes: Vec<Location> = Vec::with_capacity(n + 2);
        nodes.push(origin);
        nodes.extend_from_slice(waypoints);
        if let Some(dest) = destination {
            nodes.push(dest);
        }
        if round_trip {
            nodes.push(origin);
        }
        let distance_meters: f64 = nodes
            .windows(2)
            .map(|leg| haversine_km(leg[0], leg[1]) * 1000.0 * ROAD_FACTOR)
            .sum();

        Ok(OptimizedTrip {
            distance_meters,
            duration_seconds: distance_meters / DRIVE_SPEED_MPS,
            geometry: "mock-trip-polyline".to_string(),
            optimized_order,
        })
    }
}

#[async_trait]
impl WeatherProvider for MockConnector {
    async fn current_conditions(
        &self,
        _location: Location,
    ) -> Result<WeatherConditions, AvocetError> {
        Ok(WeatherConditions {
            temperature_c: 18.5,
            humidity: 62.0,
            wind_speed: 9.0,
            wind_direction: 225.0,
            precipitation_probability: 10.0,
            weather_code: 1,
            is_day: true,
        })
    }
}
