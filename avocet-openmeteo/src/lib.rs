//! avocet-openmeteo
//!
//! Connector for the Open-Meteo forecast API, serving current weather
//! conditions. No credential required.
#![warn(missing_docs)]

use async_trait::async_trait;
use avocet_core::connector::{AvocetConnector, ConnectorKey, WeatherProvider};
use avocet_core::types::{Location, WeatherConditions};
use avocet_core::AvocetError;
use serde::Deserialize;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/";
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m,\
wind_direction_10m,precipitation_probability,weather_code,is_day";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
    #[serde(default)]
    precipitation_probability: Option<f64>,
    weather_code: u8,
    is_day: u8,
}

impl From<CurrentBlock> for WeatherConditions {
    fn from(c: CurrentBlock) -> Self {
        Self {
            temperature_c: c.temperature_2m,
            humidity: c.relative_humidity_2m,
            wind_speed: c.wind_speed_10m,
            wind_direction: c.wind_direction_10m,
            precipitation_probability: c.precipitation_probability.unwrap_or(0.0),
            weather_code: c.weather_code,
            is_day: c.is_day != 0,
        }
    }
}

/// Open-Meteo forecast API connector.
pub struct OpenMeteoConnector {
    http: reqwest::Client,
    base: Url,
}

impl OpenMeteoConnector {
    /// Static connector key for orchestrator configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("avocet-openmeteo");

    /// Connector against the production Open-Meteo API.
    #[must_use]
    pub fn new_default() -> Self {
        Self {
            http: reqwest::Client::new(),
            base: Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!()),
        }
    }

    /// Connector against a custom base URL, for local servers.
    ///
    /// # Errors
    /// `InvalidArg` when `base_url` is not a valid URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, AvocetError> {
        let base = Url::parse(base_url)
            .map_err(|e| AvocetError::InvalidArg(format!("invalid base url: {e}")))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }
}

impl Default for OpenMeteoConnector {
    fn default() -> Self {
        Self::new_default()
    }
}

impl AvocetConnector for OpenMeteoConnector {
    fn name(&self) -> &'static str {
        "avocet-openmeteo"
    }
    fn vendor(&self) -> &'static str {
        "Open-Meteo"
    }

    fn as_weather_provider(&self) -> Option<&dyn WeatherProvider> {
        Some(self)
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoConnector {
    async fn current_conditions(
        &self,
        location: Location,
    ) -> Result<WeatherConditions, AvocetError> {
        let mut url = self.base.join("v1/forecast").map_err(|e| {
            AvocetError::connector("avocet-openmeteo", format!("bad endpoint: {e}"))
        })?;
        url.query_pairs_mut()
            .append_pair("latitude", &format!("{:.6}", location.latitude))
            .append_pair("longitude", &format!("{:.6}", location.longitude))
            .append_pair("current", CURRENT_FIELDS)
            .append_pair("wind_speed_unit", "kmh");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AvocetError::connector("avocet-openmeteo", format!("forecast: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AvocetError::connector(
                "avocet-openmeteo",
                format!("forecast: HTTP {status}"),
            ));
        }
        let body: ForecastResponse = resp
            .json()
            .await
            .map_err(|e| AvocetError::Data(format!("forecast: malformed payload: {e}")))?;
        Ok(body.current.into())
    }
}
