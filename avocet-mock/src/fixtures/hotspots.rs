use avocet_core::types::{Hotspot, HotspotId, Location};
use avocet_core::haversine_km;

/// Sentinel hotspot whose observation lookups always fail.
pub const FLAKY_SITE_ID: &str = "L-FAIL";
/// Sentinel hotspot whose observation lookups stall before answering.
pub const SLOW_SITE_ID: &str = "L-SLOW";

// Offsets in degrees from the requested origin, so fixtures track the
// search location instead of pinning it to one region.
const SITES: &[(&str, &str, f64, f64, u32)] = &[
    ("L101", "Cattail Marsh", 0.010, 0.012, 214),
    ("L102", "Sapsucker Ridge", -0.025, 0.018, 187),
    ("L103", "Heron Cove", 0.040, -0.031, 243),
    ("L104", "Millpond Overlook", -0.052, -0.044, 96),
    ("L105", "Windmill Grasslands", 0.068, 0.059, 158),
];

pub fn near(origin: Location, radius_km: f64) -> Vec<Hotspot> {
    SITES
        .iter()
        .map(|&(id, name, dlat, dlng, total)| {
            site(
                id,
                name,
                Location::new(origin.latitude + dlat, origin.longitude + dlng),
                Some(total),
            )
        })
        .filter(|h| haversine_km(origin, h.location) <= radius_km)
        .collect()
}

pub fn sentinel(id: &str, origin: Location) -> Hotspot {
    site(
        id,
        "Quarry Flats",
        Location::new(origin.latitude + 0.015, origin.longitude - 0.011),
        None,
    )
}

fn site(id: &str, name: &str, location: Location, total: Option<u32>) -> Hotspot {
    Hotspot {
        id: HotspotId::new(id),
        name: name.to_string(),
        location,
        country_code: Some("US".to_string()),
        subnational_codes: vec!["US-NY".to_string(), "US-NY-109".to_string()],
        total_species_all_time: total,
        origin_distance_km: 0.0,
        recent_species_count: None,
        has_notable_species: None,
        route_leg: None,
        observations: vec![],
    }
}
