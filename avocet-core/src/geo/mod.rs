//! Geographic primitives: stable location keys, great-circle distance,
//! corridor membership, and coordinate dedup.

/// Detour-corridor membership test for trip pre-filtering.
pub mod corridor;
/// Order-preserving coordinate dedup keyed by [`key::LocationKey`].
pub mod dedupe;
/// Great-circle distance.
pub mod distance;
/// Normalized coordinate keys for cache and dedup identity.
pub mod key;

pub use corridor::within_corridor;
pub use dedupe::{Dedup, dedupe};
pub use distance::{EARTH_RADIUS_KM, haversine_km};
pub use key::LocationKey;
