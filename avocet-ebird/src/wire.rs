//! Wire-format structs for the eBird v2 JSON payloads and their mapping
//! into `avocet-core` types.

use avocet_core::types::{Hotspot, HotspotId, Location, Observation, SpeciesTaxon};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireHotspot {
    pub loc_id: String,
    pub loc_name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub subnational1_code: Option<String>,
    #[serde(default)]
    pub subnational2_code: Option<String>,
    #[serde(default)]
    pub num_species_all_time: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireObservation {
    pub species_code: String,
    pub com_name: String,
    pub sci_name: String,
    pub loc_id: String,
    pub obs_dt: String,
    #[serde(default)]
    pub how_many: Option<u32>,
    #[serde(default = "default_true")]
    pub obs_valid: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireTaxon {
    pub species_code: String,
    pub com_name: String,
    pub sci_name: String,
    pub category: String,
}

const fn default_true() -> bool {
    true
}

pub(crate) fn map_hotspot(w: WireHotspot) -> Hotspot {
    let mut subnational_codes = Vec::new();
    if let Some(s1) = w.subnational1_code {
        subnational_codes.push(s1);
    }
    if let Some(s2) = w.subnational2_code {
        subnational_codes.push(s2);
    }
    Hotspot {
        id: HotspotId::new(w.loc_id),
        name: w.loc_name,
        location: Location::new(w.lat, w.lng),
        country_code: w.country_code,
        subnational_codes,
        total_species_all_time: w.num_species_all_time,
        origin_distance_km: 0.0,
        recent_species_count: None,
        has_notable_species: None,
        route_leg: None,
        observations: vec![],
    }
}

pub(crate) fn map_observation(w: WireObservation, is_notable: bool) -> Observation {
    Observation {
        date: parse_obs_dt(&w.obs_dt),
        species_code: w.species_code,
        common_name: w.com_name,
        scientific_name: w.sci_name,
        location_id: w.loc_id,
        count: w.how_many,
        is_notable,
        is_valid: w.obs_valid,
    }
}

pub(crate) fn map_taxon(w: WireTaxon) -> SpeciesTaxon {
    SpeciesTaxon {
        species_code: w.species_code,
        common_name: w.com_name,
        scientific_name: w.sci_name,
        category: w.category,
    }
}

// eBird reports observation timestamps as local wall-clock text, minute
// resolution, sometimes date-only. Treated as UTC; the epoch fallback for
// unparseable text keeps one bad row from failing the payload.
fn parse_obs_dt(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn hotspot_payload_maps_base_fields() {
        let json = r#"{
            "locId": "L99381",
            "locName": "Stewart Park",
            "countryCode": "US",
            "subnational1Code": "US-NY",
            "subnational2Code": "US-NY-109",
            "lat": 42.4613413,
            "lng": -76.5059255,
            "latestObsDt": "2024-05-14 07:30",
            "numSpeciesAllTime": 283
        }"#;
        let wire: WireHotspot = serde_json::from_str(json).unwrap();
        let h = map_hotspot(wire);
        assert_eq!(h.id.as_str(), "L99381");
        assert_eq!(h.name, "Stewart Park");
        assert_eq!(h.country_code.as_deref(), Some("US"));
        assert_eq!(h.subnational_codes, vec!["US-NY", "US-NY-109"]);
        assert_eq!(h.total_species_all_time, Some(283));
        assert!(h.recent_species_count.is_none());
        assert!(h.observations.is_empty());
    }

    #[test]
    fn hotspot_payload_tolerates_missing_optionals() {
        let json = r#"{"locId": "L1", "locName": "Somewhere", "lat": 1.0, "lng": 2.0}"#;
        let h = map_hotspot(serde_json::from_str(json).unwrap());
        assert!(h.country_code.is_none());
        assert!(h.subnational_codes.is_empty());
        assert!(h.total_species_all_time.is_none());
    }

    #[test]
    fn observation_payload_maps_count_and_validity() {
        let json = r#"{
            "speciesCode": "norcar",
            "comName": "Northern Cardinal",
            "sciName": "Cardinalis cardinalis",
            "locId": "L99381",
            "obsDt": "2024-05-14 07:30",
            "howMany": 4,
            "obsValid": true,
            "obsReviewed": false
        }"#;
        let o = map_observation(serde_json::from_str(json).unwrap(), false);
        assert_eq!(o.species_code, "norcar");
        assert_eq!(o.count, Some(4));
        assert!(o.is_valid);
        assert!(!o.is_notable);
        assert_eq!(o.date.hour(), 7);
    }

    #[test]
    fn x_reports_carry_no_count() {
        let json = r#"{
            "speciesCode": "cangoo",
            "comName": "Canada Goose",
            "sciName": "Branta canadensis",
            "locId": "L99381",
            "obsDt": "2024-05-14"
        }"#;
        let o = map_observation(serde_json::from_str(json).unwrap(), false);
        assert!(o.count.is_none());
        assert!(o.is_valid, "validity defaults to true when absent");
    }

    #[test]
    fn taxonomy_payload_maps_category() {
        let json = r#"{
            "sciName": "Anas platyrhynchos x rubripes",
            "comName": "Mallard x American Black Duck (hybrid)",
            "speciesCode": "x00721",
            "category": "hybrid"
        }"#;
        let t = map_taxon(serde_json::from_str(json).unwrap());
        assert_eq!(t.category, "hybrid");
        assert_eq!(t.species_code, "x00721");
    }
}
