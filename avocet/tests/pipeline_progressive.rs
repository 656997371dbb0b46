mod helpers;

use std::sync::Arc;

use avocet::{Avocet, AvocetError, Phase, Snapshot};
use avocet_core::{Location, SearchParams, SortBy};
use avocet_mock::MockConnector;
use helpers::{ORIGIN, params, quick_pacing};

async fn collect(mut rx: tokio::sync::mpsc::Receiver<Snapshot>) -> Vec<Snapshot> {
    let mut out = Vec::new();
    while let Some(s) = rx.recv().await {
        out.push(s);
    }
    out
}

#[tokio::test]
async fn base_snapshot_arrives_first_and_unenriched() {
    let avocet = Avocet::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .pacing(quick_pacing())
        .build()
        .unwrap();

    let (_handle, snapshots) = {
        let (h, rx) = avocet.search(params()).await.unwrap();
        (h, collect(rx).await)
    };

    let base = &snapshots[0];
    assert_eq!(base.phase, Phase::BaseFetch);
    assert_eq!(base.enriched, 0);
    assert!(!base.hotspots.is_empty());
    for h in &base.hotspots {
        assert!(!h.is_enriched());
        assert!(h.origin_distance_km > 0.0, "distance filled at base fetch");
    }
}

#[tokio::test]
async fn snapshots_keep_shape_and_enrichment_is_monotonic() {
    let avocet = Avocet::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .pacing(quick_pacing())
        .build()
        .unwrap();

    let (_handle, rx) = avocet.search(params()).await.unwrap();
    let snapshots = collect(rx).await;
    assert!(snapshots.len() >= 2, "base plus final at minimum");

    let base_ids: Vec<_> = snapshots[0].hotspots.iter().map(|h| h.id.clone()).collect();
    let mut last_enriched = 0;
    for s in &snapshots {
        let ids: Vec<_> = s.hotspots.iter().map(|h| h.id.clone()).collect();
        assert_eq!(ids, base_ids, "length and order fixed at base fetch");
        assert!(s.enriched >= last_enriched, "enriched never regresses");
        last_enriched = s.enriched;
    }

    let done = snapshots.last().unwrap();
    assert_eq!(done.phase, Phase::Done);
    assert_eq!(done.enriched, done.hotspots.len());
    assert!(done.failed.is_empty());
    assert!(done.hotspots.iter().all(avocet_core::Hotspot::is_enriched));
}

#[tokio::test]
async fn enrichment_fills_species_stats_from_observations() {
    let avocet = Avocet::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .pacing(quick_pacing())
        .build()
        .unwrap();

    let (_handle, rx) = avocet.search(params()).await.unwrap();
    let snapshots = collect(rx).await;
    let done = snapshots.last().unwrap();

    let marsh = done
        .hotspots
        .iter()
        .find(|h| h.id.as_str() == "L101")
        .unwrap();
    // Fixture has 4 sightings over 3 distinct species, one notable.
    assert_eq!(marsh.recent_species_count, Some(3));
    assert_eq!(marsh.has_notable_species, Some(true));
    assert_eq!(marsh.observations.len(), 4);

    let quiet = done
        .hotspots
        .iter()
        .find(|h| h.id.as_str() == "L105")
        .unwrap();
    assert_eq!(quiet.recent_species_count, Some(0));
    assert_eq!(quiet.has_notable_species, Some(false));
}

#[tokio::test]
async fn max_results_truncates_the_base_list() {
    let avocet = Avocet::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .pacing(quick_pacing())
        .build()
        .unwrap();

    let mut p = params();
    p.max_results = 2;
    let (_handle, rx) = avocet.search(p).await.unwrap();
    let snapshots = collect(rx).await;
    assert_eq!(snapshots[0].hotspots.len(), 2);
    assert_eq!(snapshots.last().unwrap().hotspots.len(), 2);
}

#[tokio::test]
async fn invalid_params_are_rejected_before_any_call() {
    let avocet = Avocet::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap();

    let bad = SearchParams {
        origin: Location::new(91.0, 0.0),
        radius_km: 25.0,
        max_results: 10,
        back_days: 14,
        sort_by: SortBy::Species,
    };
    assert!(matches!(
        avocet.search(bad).await.unwrap_err(),
        AvocetError::InvalidArg(_)
    ));

    let mut zero_radius = params();
    zero_radius.radius_km = 0.0;
    assert!(matches!(
        avocet.search(zero_radius).await.unwrap_err(),
        AvocetError::InvalidArg(_)
    ));
}

#[tokio::test]
async fn missing_observations_capability_fails_up_front() {
    let avocet = Avocet::builder()
        .with_connector(Arc::new(helpers::DiscoveryOnly))
        .build()
        .unwrap();

    assert!(matches!(
        avocet.search(params()).await.unwrap_err(),
        AvocetError::Unsupported { .. }
    ));
}

#[tokio::test]
async fn discovery_failure_is_fatal_and_produces_no_snapshots() {
    let avocet = Avocet::builder()
        .with_connector(Arc::new(helpers::FailingDiscovery))
        .build()
        .unwrap();

    assert!(matches!(
        avocet.search(params()).await.unwrap_err(),
        AvocetError::Discovery(_)
    ));
}

#[tokio::test]
async fn builder_requires_a_discovery_connector() {
    let err = Avocet::builder().build().unwrap_err();
    assert!(matches!(err, AvocetError::InvalidArg(_)));
}

#[test]
fn origin_distance_uses_great_circle_math() {
    // Ithaca to Syracuse is roughly 80 km as the crow flies.
    let syracuse = Location::new(43.05, -76.15);
    let d = avocet_core::haversine_km(ORIGIN, syracuse);
    assert!((60.0..100.0).contains(&d), "got {d}");
}
