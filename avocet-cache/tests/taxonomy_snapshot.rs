use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use avocet_cache::{ManualClock, TaxonomyCache};
use avocet_core::AvocetError;
use avocet_core::types::SpeciesTaxon;

fn taxon(code: &str) -> SpeciesTaxon {
    SpeciesTaxon {
        species_code: code.to_string(),
        common_name: format!("{code} (common)"),
        scientific_name: format!("{code} (sci)"),
        category: "species".to_string(),
    }
}

const WEEK: Duration = Duration::from_secs(7 * 24 * 3600);

#[tokio::test]
async fn snapshot_is_reused_within_ttl() {
    let clock = Arc::new(ManualClock::new());
    let cache = TaxonomyCache::with_clock(WEEK, clock.clone());
    let fetches = AtomicUsize::new(0);

    for _ in 0..3 {
        let rows = cache
            .get_or_fetch(|| async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok(vec![taxon("norcar"), taxon("blujay")])
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    clock.advance(Duration::from_secs(3 * 24 * 3600));
    let _ = cache
        .get_or_fetch(|| async {
            fetches.fetch_add(1, Ordering::SeqCst);
            Ok(vec![taxon("norcar")])
        })
        .await
        .unwrap();
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn clear_forces_a_refetch() {
    let cache = TaxonomyCache::with_clock(WEEK, Arc::new(ManualClock::new()));
    let fetches = AtomicUsize::new(0);

    let fetch = || {
        let n = fetches.fetch_add(1, Ordering::SeqCst);
        async move { Ok(vec![taxon(if n == 0 { "old" } else { "new" })]) }
    };

    let first = cache.get_or_fetch(fetch).await.unwrap();
    assert_eq!(first[0].species_code, "old");

    cache.clear().await;

    let second = cache.get_or_fetch(fetch).await.unwrap();
    assert_eq!(second[0].species_code, "new");
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn expired_snapshot_survives_a_failed_refresh() {
    let clock = Arc::new(ManualClock::new());
    let cache = TaxonomyCache::with_clock(WEEK, clock.clone());

    let rows = cache
        .get_or_fetch(|| async { Ok(vec![taxon("norcar")]) })
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);

    clock.advance(WEEK + Duration::from_secs(1));
    let rows = cache
        .get_or_fetch(|| async { Err(AvocetError::connector("ebird", "503")) })
        .await
        .unwrap();
    assert_eq!(rows[0].species_code, "norcar");
}

#[tokio::test]
async fn failed_fetch_with_no_snapshot_propagates() {
    let cache = TaxonomyCache::with_clock(WEEK, Arc::new(ManualClock::new()));
    let err = cache
        .get_or_fetch(|| async { Err(AvocetError::connector("ebird", "503")) })
        .await
        .unwrap_err();
    assert!(matches!(err, AvocetError::Connector { .. }));
}
