//! Wire-format structs for OSRM and Nominatim JSON payloads and their
//! mapping into `avocet-core` types.

use avocet_core::types::{GeocodedPlace, Location, OptimizedTrip, Route};
use avocet_core::AvocetError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmRouteResponse {
    pub code: String,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmRoute {
    pub distance: f64,
    pub duration: f64,
    #[serde(default)]
    pub geometry: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmTripResponse {
    pub code: String,
    #[serde(default)]
    pub trips: Vec<OsrmRoute>,
    #[serde(default)]
    pub waypoints: Vec<OsrmTripWaypoint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmTripWaypoint {
    pub waypoint_index: usize,
}

pub(crate) fn map_route(mut resp: OsrmRouteResponse) -> Result<Route, AvocetError> {
    check_code(&resp.code, "route")?;
    if resp.routes.is_empty() {
        return Err(AvocetError::not_found("route"));
    }
    let r = resp.routes.swap_remove(0);
    Ok(Route {
        distance_meters: r.distance,
        duration_seconds: r.duration,
        geometry: r.geometry,
    })
}

/// OSRM reports, for each submitted coordinate, its position in the
/// optimized visiting order. Inverting that gives the node index visited
/// at each position, which is the order contract [`OptimizedTrip`]
/// documents. A round trip's implicit return to the first node is made
/// explicit with a trailing repeat.
pub(crate) fn map_trip(
    mut resp: OsrmTripResponse,
    round_trip: bool,
) -> Result<OptimizedTrip, AvocetError> {
    check_code(&resp.code, "trip")?;
    if resp.trips.is_empty() {
        return Err(AvocetError::not_found("trip"));
    }

    let n = resp.waypoints.len();
    let mut optimized_order = vec![usize::MAX; n];
    for (input_index, wp) in resp.waypoints.iter().enumerate() {
        let slot = optimized_order.get_mut(wp.waypoint_index).ok_or_else(|| {
            AvocetError::Data(format!(
                "trip waypoint_index {} out of range for {n} waypoints",
                wp.waypoint_index
            ))
        })?;
        *slot = input_index;
    }
    if optimized_order.contains(&usize::MAX) {
        return Err(AvocetError::Data(
            "trip response does not visit every waypoint".to_string(),
        ));
    }
    if round_trip {
        optimized_order.push(0);
    }

    let t = resp.trips.swap_remove(0);
    Ok(OptimizedTrip {
        distance_meters: t.distance,
        duration_seconds: t.duration,
        geometry: t.geometry,
        optimized_order,
    })
}

fn check_code(code: &str, what: &str) -> Result<(), AvocetError> {
    match code {
        "Ok" => Ok(()),
        "NoRoute" | "NoTrips" => Err(AvocetError::not_found(what.to_string())),
        other => Err(AvocetError::connector(
            "avocet-osm",
            format!("{what}: service returned {other}"),
        )),
    }
}

// Nominatim serializes coordinates as strings.
#[derive(Debug, Deserialize)]
pub(crate) struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}

pub(crate) fn map_place(p: NominatimPlace) -> Result<GeocodedPlace, AvocetError> {
    let latitude = parse_coord(&p.lat, "lat")?;
    let longitude = parse_coord(&p.lon, "lon")?;
    Ok(GeocodedPlace {
        location: Location::new(latitude, longitude),
        display_address: p.display_name,
    })
}

fn parse_coord(s: &str, which: &str) -> Result<f64, AvocetError> {
    s.parse::<f64>()
        .map_err(|_| AvocetError::Data(format!("unparseable {which} coordinate: {s:?}")))
}
