//! Birding-conditions scoring and aggregation over per-location weather.

use avocet_core::types::{BirdingRating, Location, WeatherConditions, WeatherSummary};
use avocet_core::{AvocetError, LocationKey, dedupe};
use tracing::warn;

use crate::batcher::RateLimitedBatcher;
use crate::core::{Avocet, tag_err};

/// Score a WMO weather code for birding suitability, 1 (worst) to 5 (best).
///
/// Fixed table: clear 5; overcast/partly cloudy 4; light precipitation 3;
/// moderate precipitation, fog, and freezing drizzle 2; heavy
/// precipitation and thunderstorms 1. An unrecognized code scores a
/// neutral 3.
#[must_use]
pub const fn birding_score(weather_code: u8) -> u8 {
    match weather_code {
        // Clear sky, mainly clear.
        0 | 1 => 5,
        // Partly cloudy, overcast.
        2 | 3 => 4,
        // Light drizzle, light rain, light showers, light snow.
        51 | 61 | 71 | 80 => 3,
        // Fog, freezing drizzle/rain, moderate drizzle/rain/snow/showers.
        45 | 48 | 53 | 55 | 56 | 57 | 63 | 66 | 73 | 81 => 2,
        // Heavy rain/snow, violent showers, thunderstorms.
        65 | 67 | 75 | 77 | 82 | 85 | 86 | 95 | 96 | 99 => 1,
        _ => 3,
    }
}

/// Combine per-location samples into a single birding outlook.
///
/// The 1-5 mean score is scaled to 0-100 and bucketed: Excellent >= 80,
/// Good >= 60, Fair >= 40, Poor below.
///
/// # Errors
/// `NoWeatherData` when `samples` is empty; an aggregate over zero
/// locations has nothing to report.
pub fn summarize(samples: &[WeatherConditions]) -> Result<WeatherSummary, AvocetError> {
    if samples.is_empty() {
        return Err(AvocetError::NoWeatherData);
    }

    let count = samples.len() as f64;
    let mean_score = samples
        .iter()
        .map(|c| f64::from(birding_score(c.weather_code)))
        .sum::<f64>()
        / count;
    let average_score = mean_score / 5.0 * 100.0;
    let average_temperature_c = samples.iter().map(|c| c.temperature_c).sum::<f64>() / count;
    let max_wind_speed = samples.iter().map(|c| c.wind_speed).fold(0.0, f64::max);
    let max_precipitation_probability = samples
        .iter()
        .map(|c| c.precipitation_probability)
        .fold(0.0, f64::max);

    let rating = if average_score >= 80.0 {
        BirdingRating::Excellent
    } else if average_score >= 60.0 {
        BirdingRating::Good
    } else if average_score >= 40.0 {
        BirdingRating::Fair
    } else {
        BirdingRating::Poor
    };

    Ok(WeatherSummary {
        average_score,
        average_temperature_c,
        max_wind_speed,
        max_precipitation_probability,
        rating,
    })
}

impl Avocet {
    /// Current conditions at one location, through the weather cache.
    ///
    /// # Errors
    /// `Unsupported` without a weather connector; otherwise the fetch
    /// failure when the cache holds no fallback for this location.
    pub async fn current_conditions(
        &self,
        location: Location,
    ) -> Result<WeatherConditions, AvocetError> {
        let (name, weather) = self.weather()?;
        let key = LocationKey::for_location(location);
        self.weather_cache
            .get_or_fetch(key, || async {
                Self::provider_call_with_timeout(
                    name,
                    "weather",
                    self.cfg.call_timeout,
                    weather.current_conditions(location),
                )
                .await
                .map_err(|e| tag_err(name, e))
            })
            .await
    }

    /// Aggregate birding weather across locations.
    ///
    /// Input coordinates are deduplicated before any network call and the
    /// lookups run under the enrichment pacing policy. A location whose
    /// lookup fails is excluded from the aggregate rather than failing
    /// it.
    ///
    /// # Errors
    /// `Unsupported` without a weather connector; `NoWeatherData` when
    /// every lookup failed.
    pub async fn birding_weather(
        &self,
        locations: &[Location],
    ) -> Result<WeatherSummary, AvocetError> {
        // Surface missing capability before spending any calls.
        let _ = self.weather()?;

        let deduped = dedupe(locations);
        let batcher = RateLimitedBatcher::new(self.cfg.pacing);
        let (_, never_cancelled) = tokio::sync::watch::channel(false);

        let outcome = batcher
            .run(
                &deduped.unique,
                &never_cancelled,
                |_, &loc| self.current_conditions(loc),
                |_, _, _| {},
            )
            .await;

        for failure in &outcome.failures {
            warn!(
                index = failure.index,
                error = %failure.error,
                "weather lookup failed; excluding location from aggregate"
            );
        }

        let samples: Vec<WeatherConditions> =
            outcome.patches.into_iter().flatten().collect();
        summarize(&samples)
    }
}
