//! Common data structures shared across the avocet ecosystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
///
/// Equality for caching and dedup purposes is defined by
/// [`crate::geo::LocationKey`], never by raw float comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees, positive north.
    pub latitude: f64,
    /// Longitude in decimal degrees, positive east.
    pub longitude: f64,
}

impl Location {
    /// Construct a location from decimal degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `true` when both coordinates are finite and within valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Stable identifier of a hotspot, assigned by the discovery source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HotspotId(String);

impl HotspotId {
    /// Wrap a provider-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HotspotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HotspotId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A named birding location with aggregate and recent species statistics.
///
/// Created from a discovery response; mutated only by enrichment merges,
/// which add or overwrite enrichment fields and never change identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotspot {
    /// Stable identifier for the hotspot's lifetime.
    pub id: HotspotId,
    /// Display name.
    pub name: String,
    /// Geographic position.
    pub location: Location,
    /// ISO country code, when the discovery source reports one.
    pub country_code: Option<String>,
    /// Subnational region codes (state/province, county), most specific last.
    pub subnational_codes: Vec<String>,
    /// All-time species count reported by the discovery source.
    pub total_species_all_time: Option<u32>,
    /// Great-circle distance from the search origin, in kilometers.
    pub origin_distance_km: f64,
    /// Count of distinct species observed recently. Set by enrichment.
    pub recent_species_count: Option<u32>,
    /// Whether any recent observation was flagged notable. Set by enrichment.
    pub has_notable_species: Option<bool>,
    /// Driving leg from the search origin. Set by routing enrichment.
    pub route_leg: Option<RouteLeg>,
    /// Recent observations, in the order the observations source returned them.
    pub observations: Vec<Observation>,
}

impl Hotspot {
    /// `true` once the observations enrichment for this hotspot has been applied.
    #[must_use]
    pub const fn is_enriched(&self) -> bool {
        self.recent_species_count.is_some()
    }
}

/// A single recent sighting at a hotspot. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Taxonomy species code (e.g. "norcar").
    pub species_code: String,
    /// Common (vernacular) species name.
    pub common_name: String,
    /// Scientific species name.
    pub scientific_name: String,
    /// Identifier of the location where the sighting was made.
    pub location_id: String,
    /// Timestamp of the sighting.
    pub date: DateTime<Utc>,
    /// Individual count, when reported ("X" reports carry no count).
    pub count: Option<u32>,
    /// Flagged as a regionally notable sighting.
    pub is_notable: bool,
    /// Passed the source's review process.
    pub is_valid: bool,
}

/// One row of the bulk species taxonomy snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesTaxon {
    /// Taxonomy species code.
    pub species_code: String,
    /// Common (vernacular) name.
    pub common_name: String,
    /// Scientific name.
    pub scientific_name: String,
    /// Taxonomic category (species, hybrid, spuh, ...).
    pub category: String,
}

/// A driven leg between two points, produced by routing enrichment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RouteLeg {
    /// Leg start.
    pub start: Location,
    /// Leg end.
    pub end: Location,
    /// Driving distance in meters.
    pub distance_meters: f64,
    /// Driving duration in seconds.
    pub duration_seconds: f64,
}

/// A routed path between two points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    /// Total driving distance in meters.
    pub distance_meters: f64,
    /// Total driving duration in seconds.
    pub duration_seconds: f64,
    /// Encoded route geometry (provider-native polyline).
    pub geometry: String,
}

/// A multi-point trip with an externally optimized visiting order.
///
/// `optimized_order` is a permutation over trip nodes: the origin is
/// index 0, waypoints are 1..=n, and an open trip's fixed destination is
/// index n+1. Round trips repeat the origin index at the end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizedTrip {
    /// Total driving distance in meters.
    pub distance_meters: f64,
    /// Total driving duration in seconds.
    pub duration_seconds: f64,
    /// Encoded trip geometry (provider-native polyline).
    pub geometry: String,
    /// Visiting order over trip node indices; see type-level docs.
    pub optimized_order: Vec<usize>,
}

/// A forward-geocoding result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodedPlace {
    /// Resolved coordinates.
    pub location: Location,
    /// Human-readable display address.
    pub display_address: String,
}

/// Current weather at a location, as returned by the weather source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeatherConditions {
    /// Air temperature in degrees Celsius.
    pub temperature_c: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Wind speed in km/h.
    pub wind_speed: f64,
    /// Wind direction in degrees.
    pub wind_direction: f64,
    /// Precipitation probability in percent.
    pub precipitation_probability: f64,
    /// WMO weather interpretation code.
    pub weather_code: u8,
    /// Daylight flag at observation time.
    pub is_day: bool,
}

/// Overall birding-conditions rating bucket on a 0-100 scaled score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BirdingRating {
    /// Scaled score >= 80.
    Excellent,
    /// Scaled score >= 60.
    Good,
    /// Scaled score >= 40.
    Fair,
    /// Scaled score < 40.
    Poor,
}

/// Aggregate of per-location weather samples into one birding outlook.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeatherSummary {
    /// Mean per-location birding score, scaled to 0-100.
    pub average_score: f64,
    /// Mean temperature across sampled locations, degrees Celsius.
    pub average_temperature_c: f64,
    /// Maximum wind speed across sampled locations, km/h.
    pub max_wind_speed: f64,
    /// Maximum precipitation probability across sampled locations, percent.
    pub max_precipitation_probability: f64,
    /// Bucketed rating derived from `average_score`.
    pub rating: BirdingRating,
}

/// Sort order applied by the caller to a finished snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortBy {
    /// Most recently observed distinct species first.
    #[default]
    Species,
    /// Closest to the search origin first.
    Distance,
    /// Shortest driving time first, when routing data is present.
    DriveTime,
}

/// Parameters of one hotspot search invocation.
///
/// Immutable for the invocation's lifetime; concurrent searches each
/// receive their own value rather than reading shared state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SearchParams {
    /// Search origin.
    pub origin: Location,
    /// Search radius in kilometers.
    pub radius_km: f64,
    /// Maximum number of hotspots to keep from discovery.
    pub max_results: usize,
    /// Lookback window for recent activity, in days.
    pub back_days: u32,
    /// Sort order the caller intends to apply to the finished snapshot.
    pub sort_by: SortBy,
}

impl SearchParams {
    /// Validate coordinate and radius ranges.
    ///
    /// # Errors
    /// Returns `InvalidArg` for non-finite or out-of-range origin
    /// coordinates, or a non-positive radius. Distance math downstream
    /// assumes validated input and does not re-check.
    pub fn validate(&self) -> Result<(), crate::AvocetError> {
        if !self.origin.is_valid() {
            return Err(crate::AvocetError::InvalidArg(format!(
                "origin out of range: ({}, {})",
                self.origin.latitude, self.origin.longitude
            )));
        }
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(crate::AvocetError::InvalidArg(format!(
                "radius must be positive, got {}",
                self.radius_km
            )));
        }
        if self.max_results == 0 {
            return Err(crate::AvocetError::InvalidArg(
                "max_results must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
