//! avocet-ebird
//!
//! Connector that implements the `avocet-core` contracts on top of the
//! eBird v2 API: hotspot discovery, recent observations, and the species
//! taxonomy. Requires an eBird API token.
#![warn(missing_docs)]

mod wire;

use std::collections::HashSet;

use async_trait::async_trait;
use avocet_core::connector::{
    AvocetConnector, ConnectorKey, DiscoveryProvider, ObservationsProvider, TaxonomyProvider,
};
use avocet_core::types::{Hotspot, HotspotId, Location, Observation, SpeciesTaxon};
use avocet_core::AvocetError;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://api.ebird.org/v2/";
// Service-side limits on the hotspot search.
const MAX_DIST_KM: f64 = 50.0;
const MAX_BACK_DAYS: u32 = 30;

/// eBird v2 API connector.
///
/// The API token is construction state, sent as the `x-ebirdapitoken`
/// header on every request, and never exposed through the public API.
pub struct EbirdConnector {
    http: reqwest::Client,
    base: Url,
    token: String,
}

impl EbirdConnector {
    /// Static connector key for orchestrator configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("avocet-ebird");

    /// Build a connector against the production eBird API.
    #[must_use]
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            // The constant is a valid URL; parsing it cannot fail.
            base: Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!()),
            token: api_token.into(),
        }
    }

    /// Build a connector against a custom base URL, for local servers.
    ///
    /// # Errors
    /// `InvalidArg` when `base_url` is not a valid URL.
    pub fn with_base_url(
        api_token: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, AvocetError> {
        let base = Url::parse(base_url)
            .map_err(|e| AvocetError::InvalidArg(format!("invalid base url: {e}")))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
            token: api_token.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AvocetError> {
        self.base
            .join(path)
            .map_err(|e| AvocetError::connector("avocet-ebird", format!("bad endpoint {path}: {e}")))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        what: &str,
    ) -> Result<T, AvocetError> {
        let resp = self
            .http
            .get(url)
            .header("x-ebirdapitoken", &self.token)
            .send()
            .await
            .map_err(|e| AvocetError::connector("avocet-ebird", format!("{what}: {e}")))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AvocetError::not_found(what.to_string()));
        }
        if !status.is_success() {
            return Err(AvocetError::connector(
                "avocet-ebird",
                format!("{what}: HTTP {status}"),
            ));
        }
        resp.json::<T>()
            .await
            .map_err(|e| AvocetError::Data(format!("{what}: malformed payload: {e}")))
    }
}

impl AvocetConnector for EbirdConnector {
    fn name(&self) -> &'static str {
        "avocet-ebird"
    }
    fn vendor(&self) -> &'static str {
        "eBird (Cornell Lab of Ornithology)"
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
}

#[async_trait]
impl DiscoveryProvider for EbirdConnector {
    async fn nearby_hotspots(
        &self,
        origin: Location,
        radius_km: f64,
        back_days: u32,
    ) -> Result<Vec<Hotspot>, AvocetError> {
        let mut url = self.endpoint("ref/hotspot/geo")?;
        url.query_pairs_mut()
            .append_pair("lat", &format!("{:.2}", origin.latitude))
            .append_pair("lng", &format!("{:.2}", origin.longitude))
            .append_pair("dist", &format!("{:.1}", radius_km.min(MAX_DIST_KM)))
            .append_pair("back", &back_days.clamp(1, MAX_BACK_DAYS).to_string())
            .append_pair("fmt", "json");

        let rows: Vec<wire::WireHotspot> = self.get_json(url, "nearby hotspots").await?;
        Ok(rows.into_iter().map(wire::map_hotspot).collect())
    }
}

#[async_trait]
impl ObservationsProvider for EbirdConnector {
    async fn recent_observations(
        &self,
        hotspot: &HotspotId,
        back_days: u32,
    ) -> Result<Vec<Observation>, AvocetError> {
        let back = back_days.clamp(1, MAX_BACK_DAYS).to_string();

        let mut url = self.endpoint(&format!("data/obs/{}/recent", hotspot.as_str()))?;
        url.query_pairs_mut().append_pair("back", &back);
        let rows: Vec<wire::WireObservation> = self.get_json(url, "recent observations").await?;

        // Notability is a separate feed; species present there get the flag.
        let mut notable_url =
            self.endpoint(&format!("data/obs/{}/recent/notable", hotspot.as_str()))?;
        notable_url.query_pairs_mut().append_pair("back", &back);
        let notable: HashSet<String> = match self
            .get_json::<Vec<wire::WireObservation>>(notable_url, "notable observations")
            .await
        {
            Ok(rows) => rows.into_iter().map(|o| o.species_code).collect(),
            Err(err) => {
                // The main feed still answers; notability just stays unflagged.
                tracing::warn!(error = %err, "notable feed unavailable");
                HashSet::new()
            }
        };

        Ok(rows
            .into_iter()
            .map(|o| {
                let is_notable = notable.contains(&o.species_code);
                wire::map_observation(o, is_notable)
            })
            .collect())
    }
}

#[async_trait]
impl TaxonomyProvider for EbirdConnector {
    async fn taxonomy(&self) -> Result<Vec<SpeciesTaxon>, AvocetError> {
        let mut url = self.endpoint("ref/taxonomy/ebird")?;
        url.query_pairs_mut().append_pair("fmt", "json");
        let rows: Vec<wire::WireTaxon> = self.get_json(url, "taxonomy").await?;
        Ok(rows.into_iter().map(wire::map_taxon).collect())
    }
}
