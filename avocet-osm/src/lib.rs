//! avocet-osm
//!
//! OpenStreetMap-backed connectors: OSRM driving routes and optimized
//! trips, and Nominatim forward/reverse geocoding.
#![warn(missing_docs)]

mod wire;

use std::fmt::Write as _;

use async_trait::async_trait;
use avocet_core::connector::{
    AvocetConnector, ConnectorKey, GeocodingProvider, RoutingProvider,
};
use avocet_core::types::{GeocodedPlace, Location, OptimizedTrip, Route};
use avocet_core::AvocetError;
use url::Url;

const OSRM_BASE_URL: &str = "https://router.project-osrm.org/";
const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org/";
// Nominatim's usage policy requires an identifying agent.
const USER_AGENT: &str = concat!("avocet/", env!("CARGO_PKG_VERSION"));

async fn get_json<T: serde::de::DeserializeOwned>(
    http: &reqwest::Client,
    url: Url,
    connector: &'static str,
    what: &str,
) -> Result<T, AvocetError> {
    let resp = http
        .get(url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await
        .map_err(|e| AvocetError::connector(connector, format!("{what}: {e}")))?;

    let status = resp.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(AvocetError::not_found(what.to_string()));
    }
    if !status.is_success() {
        return Err(AvocetError::connector(
            connector,
            format!("{what}: HTTP {status}"),
        ));
    }
    resp.json::<T>()
        .await
        .map_err(|e| AvocetError::Data(format!("{what}: malformed payload: {e}")))
}

fn parse_base(base_url: &str) -> Result<Url, AvocetError> {
    Url::parse(base_url).map_err(|e| AvocetError::InvalidArg(format!("invalid base url: {e}")))
}

// OSRM takes coordinates as semicolon-separated lng,lat pairs in the path.
fn coord_path(coords: &[Location]) -> String {
    let mut out = String::new();
    for (i, c) in coords.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        let _ = write!(out, "{:.6},{:.6}", c.longitude, c.latitude);
    }
    out
}

/// OSRM routing connector.
pub struct OsrmConnector {
    http: reqwest::Client,
    base: Url,
}

impl OsrmConnector {
    /// Static connector key for orchestrator configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("avocet-osm");

    /// Connector against the public OSRM demo server.
    #[must_use]
    pub fn new_default() -> Self {
        Self {
            http: reqwest::Client::new(),
            base: Url::parse(OSRM_BASE_URL).unwrap_or_else(|_| unreachable!()),
        }
    }

    /// Connector against a self-hosted OSRM instance.
    ///
    /// # Errors
    /// `InvalidArg` when `base_url` is not a valid URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, AvocetError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base: parse_base(base_url)?,
        })
    }

    fn endpoint(&self, service: &str, coords: &[Location]) -> Result<Url, AvocetError> {
        self.base
            .join(&format!("{service}/v1/driving/{}", coord_path(coords)))
            .map_err(|e| AvocetError::connector("avocet-osm", format!("bad endpoint: {e}")))
    }
}

impl Default for OsrmConnector {
    fn default() -> Self {
        Self::new_default()
    }
}

impl AvocetConnector for OsrmConnector {
    fn name(&self) -> &'static str {
        "avocet-osm"
    }
    fn vendor(&self) -> &'static str {
        "OSRM (OpenStreetMap)"
    }

    fn as_routing_provider(&self) -> Option<&dyn RoutingProvider> {
        Some(self)
    }
}

#[async_trait]
impl RoutingProvider for OsrmConnector {
    async fn route(&self, start: Location, end: Location) -> Result<Route, AvocetError> {
        let mut url = self.endpoint("route", &[start, end])?;
        url.query_pairs_mut()
            .append_pair("overview", "full")
            .append_pair("geometries", "polyline");
        let resp: wire::OsrmRouteResponse =
            get_json(&self.http, url, "avocet-osm", "route").await?;
        wire::map_route(resp)
    }

    async fn optimized_trip(
        &self,
        origin: Location,
        waypoints: &[Location],
        destination: Option<Location>,
        round_trip: bool,
    ) -> Result<OptimizedTrip, AvocetError> {
        let mut coords = Vec::with_capacity(waypoints.len() + 2);
        coords.push(origin);
        coords.extend_from_slice(waypoints);
        if let Some(dest) = destination {
            coords.push(dest);
        }

        let mut url = self.endpoint("trip", &coords)?;
        {
            let mut q = url.query_pairs_mut();
            q.append_pair("roundtrip", if round_trip { "true" } else { "false" })
                .append_pair("source", "first")
                .append_pair("overview", "full")
                .append_pair("geometries", "polyline");
            if destination.is_some() {
                q.append_pair("destination", "last");
            }
        }

        let resp: wire::OsrmTripResponse = get_json(&self.http, url, "avocet-osm", "trip").await?;
        wire::map_trip(resp, round_trip)
    }
}

/// Nominatim geocoding connector.
pub struct NominatimConnector {
    http: reqwest::Client,
    base: Url,
}

impl NominatimConnector {
    /// Static connector key for orchestrator configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("avocet-nominatim");

    /// Connector against the public Nominatim server.
    #[must_use]
    pub fn new_default() -> Self {
        Self {
            http: reqwest::Client::new(),
            base: Url::parse(NOMINATIM_BASE_URL).unwrap_or_else(|_| unreachable!()),
        }
    }

    /// Connector against a self-hosted Nominatim instance.
    ///
    /// # Errors
    /// `InvalidArg` when `base_url` is not a valid URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, AvocetError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base: parse_base(base_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AvocetError> {
        self.base.join(path).map_err(|e| {
            AvocetError::connector("avocet-nominatim", format!("bad endpoint {path}: {e}"))
        })
    }
}

impl Default for NominatimConnector {
    fn default() -> Self {
        Self::new_default()
    }
}

impl AvocetConnector for NominatimConnector {
    fn name(&self) -> &'static str {
        "avocet-nominatim"
    }
    fn vendor(&self) -> &'static str {
        "Nominatim (OpenStreetMap)"
    }

    fn as_geocoding_provider(&self) -> Option<&dyn GeocodingProvider> {
        Some(self)
    }
}

#[async_trait]
impl GeocodingProvider for NominatimConnector {
    async fn forward(&self, address: &str) -> Result<GeocodedPlace, AvocetError> {
        let mut url = self.endpoint("search")?;
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("format", "jsonv2")
            .append_pair("limit", "1");

        let mut places: Vec<wire::NominatimPlace> =
            get_json(&self.http, url, "avocet-nominatim", "forward geocode").await?;
        if places.is_empty() {
            return Err(AvocetError::not_found(format!("address: {address}")));
        }
        wire::map_place(places.swap_remove(0))
    }

    async fn reverse(&self, location: Location) -> Result<String, AvocetError> {
        let mut url = self.endpoint("reverse")?;
        url.query_pairs_mut()
            .append_pair("lat", &format!("{:.6}", location.latitude))
            .append_pair("lon", &format!("{:.6}", location.longitude))
            .append_pair("format", "jsonv2");

        let place: wire::NominatimPlace =
            get_json(&self.http, url, "avocet-nominatim", "reverse geocode").await?;
        Ok(place.display_name)
    }
}
