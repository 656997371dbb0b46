use async_trait::async_trait;

use crate::AvocetError;
use crate::types::{
    GeocodedPlace, Hotspot, HotspotId, Location, Observation, OptimizedTrip, Route, SpeciesTaxon,
    WeatherConditions,
};

/// A stable identifier for a connector, used in logs and error tagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectorKey(&'static str);

impl ConnectorKey {
    /// Construct a key from a static connector name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Borrow the key as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ConnectorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Focused role trait for connectors that discover hotspots near a point.
///
/// Any credential the source requires is construction state of the
/// connector, not a per-call argument.
#[async_trait]
pub trait DiscoveryProvider: Send + Sync {
    /// List hotspots within `radius_km` of `origin` with activity inside
    /// the `back_days` lookback window.
    ///
    /// Returned hotspots carry base fields only; enrichment fields are
    /// unset and `origin_distance_km` is 0 until the orchestrator fills it.
    async fn nearby_hotspots(
        &self,
        origin: Location,
        radius_km: f64,
        back_days: u32,
    ) -> Result<Vec<Hotspot>, AvocetError>;
}

/// Focused role trait for connectors that report recent observations.
#[async_trait]
pub trait ObservationsProvider: Send + Sync {
    /// Fetch recent observations at one hotspot within the lookback window.
    async fn recent_observations(
        &self,
        hotspot: &HotspotId,
        back_days: u32,
    ) -> Result<Vec<Observation>, AvocetError>;
}

/// Focused role trait for connectors that serve the species taxonomy.
#[async_trait]
pub trait TaxonomyProvider: Send + Sync {
    /// Fetch the full species taxonomy snapshot.
    async fn taxonomy(&self) -> Result<Vec<SpeciesTaxon>, AvocetError>;
}

/// Focused role trait for forward and reverse geocoding.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Resolve a free-form address to coordinates and a display address.
    async fn forward(&self, address: &str) -> Result<GeocodedPlace, AvocetError>;

    /// Resolve coordinates to a display address.
    async fn reverse(&self, location: Location) -> Result<String, AvocetError>;
}

/// Focused role trait for driving-route computation.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Compute a two-point driving route.
    async fn route(&self, start: Location, end: Location) -> Result<Route, AvocetError>;

    /// Compute a multi-point trip with an optimized visiting order.
    ///
    /// The returned order uses the node index space documented on
    /// [`OptimizedTrip`]; reconciling it against the waypoint list is the
    /// orchestrator's job, not the connector's.
    async fn optimized_trip(
        &self,
        origin: Location,
        waypoints: &[Location],
        destination: Option<Location>,
        round_trip: bool,
    ) -> Result<OptimizedTrip, AvocetError>;
}

/// Focused role trait for current weather conditions.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch current conditions at a location.
    async fn current_conditions(
        &self,
        location: Location,
    ) -> Result<WeatherConditions, AvocetError>;
}

/// Primary connector interface: identity plus capability advertisement.
///
/// Connectors advertise each capability by returning a usable trait
/// object from the matching `as_*_provider` accessor; the default for
/// every accessor is `None`.
pub trait AvocetConnector: Send + Sync {
    /// A stable identifier for logs and error tagging (e.g. "avocet-ebird").
    fn name(&self) -> &'static str;

    /// Canonical connector key constructed from the static name.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Advertise hotspot discovery capability.
    fn as_discovery_provider(&self) -> Option<&dyn DiscoveryProvider> {
        None
    }

    /// Advertise recent-observations capability.
    fn as_observations_provider(&self) -> Option<&dyn ObservationsProvider> {
        None
    }

    /// Advertise taxonomy capability.
    fn as_taxonomy_provider(&self) -> Option<&dyn TaxonomyProvider> {
        None
    }

    /// Advertise geocoding capability.
    fn as_geocoding_provider(&self) -> Option<&dyn GeocodingProvider> {
        None
    }

    /// Advertise routing capability.
    fn as_routing_provider(&self) -> Option<&dyn RoutingProvider> {
        None
    }

    /// Advertise weather capability.
    fn as_weather_provider(&self) -> Option<&dyn WeatherProvider> {
        None
    }
}
