mod helpers;

use std::sync::Arc;

use avocet::{Avocet, AvocetError, reconcile_trip_order};
use avocet_core::Location;
use avocet_mock::MockConnector;
use helpers::ORIGIN;

const A: Location = Location::new(42.45, -76.49);
const B: Location = Location::new(42.46, -76.47);
const C: Location = Location::new(42.47, -76.45);

mod reconcile {
    use super::*;

    #[test]
    fn identity_order_preserves_waypoints() {
        let out = reconcile_trip_order(&[A, B, C], &[0, 1, 2, 3], false, false).unwrap();
        assert_eq!(out, vec![A, B, C]);
    }

    #[test]
    fn permuted_round_trip_reorders_stops() {
        // Visit order origin, C, A, B, back to origin.
        let out = reconcile_trip_order(&[A, B, C], &[0, 3, 1, 2, 0], true, false).unwrap();
        assert_eq!(out, vec![C, A, B]);
    }

    #[test]
    fn open_trip_excludes_origin_and_destination_from_stops() {
        // Nodes: origin 0, waypoints 1..=2, destination 3.
        let out = reconcile_trip_order(&[A, B], &[0, 2, 1, 3], false, true).unwrap();
        assert_eq!(out, vec![B, A]);
    }

    #[test]
    fn wrong_length_is_a_mismatch() {
        let err = reconcile_trip_order(&[A, B], &[0, 1], false, false).unwrap_err();
        assert!(matches!(err, AvocetError::OrderMismatch { .. }));
    }

    #[test]
    fn order_must_start_at_the_origin() {
        let err = reconcile_trip_order(&[A, B], &[1, 0, 2], false, false).unwrap_err();
        assert!(matches!(err, AvocetError::OrderMismatch { .. }));
    }

    #[test]
    fn round_trip_must_return_to_the_origin() {
        let err = reconcile_trip_order(&[A, B], &[0, 1, 2, 1], true, false).unwrap_err();
        assert!(matches!(err, AvocetError::OrderMismatch { .. }));
    }

    #[test]
    fn open_trip_must_end_at_the_destination() {
        let err = reconcile_trip_order(&[A, B], &[0, 3, 1, 2], false, true).unwrap_err();
        assert!(matches!(err, AvocetError::OrderMismatch { .. }));
    }

    #[test]
    fn repeated_waypoint_is_a_mismatch() {
        let err = reconcile_trip_order(&[A, B], &[0, 1, 1], false, false).unwrap_err();
        assert!(matches!(err, AvocetError::OrderMismatch { .. }));
    }

    #[test]
    fn out_of_range_index_is_a_mismatch() {
        let err = reconcile_trip_order(&[A, B], &[0, 1, 7], false, false).unwrap_err();
        assert!(matches!(err, AvocetError::OrderMismatch { .. }));
    }

    #[test]
    fn round_trip_with_destination_is_contradictory() {
        let err = reconcile_trip_order(&[A, B], &[0, 1, 2, 0], true, true).unwrap_err();
        assert!(matches!(err, AvocetError::InvalidArg(_)));
    }
}

fn orchestrator() -> Avocet {
    Avocet::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn route_returns_positive_distance_and_duration() {
    let route = orchestrator().route(ORIGIN, C).await.unwrap();
    assert!(route.distance_meters > 0.0);
    assert!(route.duration_seconds > 0.0);
    assert!(!route.geometry.is_empty());
}

#[tokio::test]
async fn round_trip_visits_every_candidate() {
    let trip = orchestrator()
        .plan_trip(ORIGIN, &[A, B, C], None, true, None)
        .await
        .unwrap();
    assert_eq!(trip.stops.len(), 3);
    assert!(trip.skipped.is_empty());
    assert!(trip.distance_meters > 0.0);
}

#[tokio::test]
async fn corridor_filter_drops_far_detours_before_routing() {
    // Destination roughly 8 km east; Rochester is a 100+ km detour.
    let destination = Location::new(42.44, -76.40);
    let rochester = Location::new(43.16, -77.61);

    let trip = orchestrator()
        .plan_trip(ORIGIN, &[A, B, rochester], Some(destination), false, Some(10.0))
        .await
        .unwrap();

    assert_eq!(trip.stops.len(), 2);
    assert_eq!(trip.skipped.len(), 1);
    assert!((trip.skipped[0].latitude - rochester.latitude).abs() < f64::EPSILON);
}

#[tokio::test]
async fn all_candidates_filtered_out_is_an_error() {
    let destination = Location::new(42.44, -76.40);
    let rochester = Location::new(43.16, -77.61);

    let err = orchestrator()
        .plan_trip(ORIGIN, &[rochester], Some(destination), false, Some(5.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AvocetError::InvalidArg(_)));
}

#[tokio::test]
async fn round_trip_with_destination_is_rejected_up_front() {
    let err = orchestrator()
        .plan_trip(ORIGIN, &[A], Some(B), true, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AvocetError::InvalidArg(_)));
}

#[tokio::test]
async fn no_corridor_filter_without_a_detour_budget() {
    let destination = Location::new(42.44, -76.40);
    let rochester = Location::new(43.16, -77.61);

    let trip = orchestrator()
        .plan_trip(ORIGIN, &[A, rochester], Some(destination), false, None)
        .await
        .unwrap();
    assert_eq!(trip.stops.len(), 2);
    assert!(trip.skipped.is_empty());
}

mod route_legs {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use avocet::sorted;
    use avocet_core::connector::{AvocetConnector, DiscoveryProvider, RoutingProvider};
    use avocet_core::types::{Hotspot, HotspotId, RouteLeg, SortBy};
    use avocet_core::{OptimizedTrip, Route, haversine_km};

    fn hotspot(id: &str, location: Location, origin_distance_km: f64) -> Hotspot {
        Hotspot {
            id: HotspotId::new(id),
            name: id.to_string(),
            location,
            country_code: None,
            subnational_codes: vec![],
            total_species_all_time: None,
            origin_distance_km,
            recent_species_count: None,
            has_notable_species: None,
            route_leg: None,
            observations: vec![],
        }
    }

    /// Routing where longer straight-line hops drive faster: the closest
    /// stop gets the longest duration, so drive-time and distance
    /// orderings disagree.
    struct ContraryRouting {
        calls: AtomicUsize,
    }

    impl ContraryRouting {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl AvocetConnector for ContraryRouting {
        fn name(&self) -> &'static str {
            "contrary-routing"
        }
        fn as_discovery_provider(&self) -> Option<&dyn DiscoveryProvider> {
            Some(self)
        }
        fn as_routing_provider(&self) -> Option<&dyn RoutingProvider> {
            Some(self)
        }
    }

    #[async_trait]
    impl DiscoveryProvider for ContraryRouting {
        async fn nearby_hotspots(
            &self,
            _origin: Location,
            _radius_km: f64,
            _back_days: u32,
        ) -> Result<Vec<Hotspot>, AvocetError> {
            Ok(vec![])
        }
    }

    #[async_trait]
    impl RoutingProvider for ContraryRouting {
        async fn route(&self, start: Location, end: Location) -> Result<Route, AvocetError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Rochester is off the road network in this script.
            if end.latitude > 43.0 {
                return Err(AvocetError::connector("contrary-routing", "no road access"));
            }
            let km = haversine_km(start, end);
            Ok(Route {
                distance_meters: km * 1000.0,
                duration_seconds: 3_600.0 / (1.0 + km),
                geometry: "contrary-polyline".to_string(),
            })
        }

        async fn optimized_trip(
            &self,
            _origin: Location,
            _waypoints: &[Location],
            _destination: Option<Location>,
            _round_trip: bool,
        ) -> Result<OptimizedTrip, AvocetError> {
            Err(AvocetError::unsupported("routing/trip"))
        }
    }

    #[tokio::test]
    async fn legs_are_attached_in_place() {
        let avocet = Avocet::builder()
            .with_connector(Arc::new(MockConnector::new()))
            .pacing(helpers::quick_pacing())
            .build()
            .unwrap();

        let mut hotspots = vec![hotspot("near", A, 1.0), hotspot("far", C, 5.0)];
        let attached = avocet
            .enrich_route_legs(ORIGIN, &mut hotspots)
            .await
            .unwrap();

        assert_eq!(attached, 2);
        for h in &hotspots {
            let leg = h.route_leg.as_ref().unwrap();
            assert!((leg.start.latitude - ORIGIN.latitude).abs() < f64::EPSILON);
            assert!(leg.distance_meters > 0.0);
            assert!(leg.duration_seconds > 0.0);
        }
    }

    #[tokio::test]
    async fn drive_time_order_follows_routed_durations_not_distance() {
        let routing = ContraryRouting::new();
        let avocet = Avocet::builder()
            .with_connector(routing.clone())
            .pacing(helpers::quick_pacing())
            .build()
            .unwrap();

        let near = Location::new(42.45, -76.49);
        let far = Location::new(42.60, -76.30);
        let mut hotspots = vec![
            hotspot("near", near, haversine_km(ORIGIN, near)),
            hotspot("far", far, haversine_km(ORIGIN, far)),
        ];
        avocet
            .enrich_route_legs(ORIGIN, &mut hotspots)
            .await
            .unwrap();

        let by_distance: Vec<String> = sorted(hotspots.clone(), SortBy::Distance)
            .iter()
            .map(|h| h.id.to_string())
            .collect();
        let by_drive_time: Vec<String> = sorted(hotspots, SortBy::DriveTime)
            .iter()
            .map(|h| h.id.to_string())
            .collect();

        assert_eq!(by_distance, vec!["near", "far"]);
        assert_eq!(by_drive_time, vec!["far", "near"]);
    }

    #[tokio::test]
    async fn a_failed_leg_leaves_the_hotspot_unrouted() {
        let routing = ContraryRouting::new();
        let avocet = Avocet::builder()
            .with_connector(routing.clone())
            .pacing(helpers::quick_pacing())
            .build()
            .unwrap();

        let rochester = Location::new(43.16, -77.61);
        let mut hotspots = vec![hotspot("near", A, 1.0), hotspot("rochester", rochester, 110.0)];
        let attached = avocet
            .enrich_route_legs(ORIGIN, &mut hotspots)
            .await
            .unwrap();

        assert_eq!(attached, 1);
        assert!(hotspots[0].route_leg.is_some());
        assert!(hotspots[1].route_leg.is_none());
    }

    #[tokio::test]
    async fn already_routed_hotspots_are_skipped() {
        let routing = ContraryRouting::new();
        let avocet = Avocet::builder()
            .with_connector(routing.clone())
            .pacing(helpers::quick_pacing())
            .build()
            .unwrap();

        let mut routed = hotspot("routed", A, 1.0);
        routed.route_leg = Some(RouteLeg {
            start: ORIGIN,
            end: A,
            distance_meters: 1_500.0,
            duration_seconds: 120.0,
        });
        let mut hotspots = vec![routed];

        let attached = avocet
            .enrich_route_legs(ORIGIN, &mut hotspots)
            .await
            .unwrap();
        assert_eq!(attached, 0);
        assert_eq!(routing.calls.load(Ordering::SeqCst), 0);
        let leg = hotspots[0].route_leg.as_ref().unwrap();
        assert!((leg.duration_seconds - 120.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn routing_capability_is_checked_up_front() {
        let avocet = Avocet::builder()
            .with_connector(Arc::new(helpers::DiscoveryOnly))
            .build()
            .unwrap();

        let mut hotspots = vec![hotspot("near", A, 1.0)];
        let err = avocet
            .enrich_route_legs(ORIGIN, &mut hotspots)
            .await
            .unwrap_err();
        assert!(matches!(err, AvocetError::Unsupported { .. }));
    }
}
