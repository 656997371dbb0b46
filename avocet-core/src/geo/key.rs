use crate::types::Location;

/// Stable cache/dedup key for a coordinate pair.
///
/// Coordinates are rounded to 6 decimal places (~0.11 m at the equator)
/// and concatenated, so two locations within that resolution collapse to
/// the same key. Pure and deterministic; there is no error path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey(String);

impl LocationKey {
    /// Build the key for a location.
    #[must_use]
    pub fn for_location(loc: Location) -> Self {
        // Round before formatting so -0.0000004 and 0.0000004 agree.
        let lat = (loc.latitude * 1e6).round() / 1e6;
        let lng = (loc.longitude * 1e6).round() / 1e6;
        Self(format!("{lat:.6},{lng:.6}"))
    }

    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Location> for LocationKey {
    fn from(loc: Location) -> Self {
        Self::for_location(loc)
    }
}
