//! avocet-cache
//!
//! TTL caches with stale-fallback semantics. A fresh entry is served
//! without touching the network; a miss or expired entry triggers the
//! caller-injected fetch; a failed fetch falls back to the expired value
//! when one exists. Expiry alone never evicts an entry, so a transient
//! source outage degrades answers instead of failing them.
#![warn(missing_docs)]

/// Injectable time sources.
pub mod clock;
/// Typed fronts for geocoding, taxonomy, and weather.
pub mod fronts;
/// The generic keyed TTL store.
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use fronts::{GeocodeCache, TaxonomyCache, WeatherCache, geocode_cache, weather_cache};
pub use store::{Lookup, TtlCache};
