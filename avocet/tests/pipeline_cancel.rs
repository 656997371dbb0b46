mod helpers;

use std::sync::Arc;
use std::time::Duration;

use avocet::{Avocet, Phase, Snapshot};
use avocet_core::PacingConfig;
use avocet_mock::MockConnector;
use helpers::params;

async fn drain(mut rx: tokio::sync::mpsc::Receiver<Snapshot>) -> Vec<Snapshot> {
    let mut out = Vec::new();
    while let Some(s) = rx.recv().await {
        out.push(s);
    }
    out
}

#[tokio::test]
async fn stop_before_first_dispatch_yields_an_unenriched_final_snapshot() {
    let avocet = Avocet::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .pacing(PacingConfig {
            min_call_interval: Duration::from_millis(50),
            emit_every: 1,
        })
        .build()
        .unwrap();

    let (handle, rx) = avocet.search(params()).await.unwrap();
    // Current-thread runtime: the enrichment task has not been polled
    // yet, so the stop lands before any dispatch.
    handle.stop();

    let snapshots = drain(rx).await;
    assert_eq!(snapshots[0].phase, Phase::BaseFetch);
    let done = snapshots.last().unwrap();
    assert_eq!(done.phase, Phase::Done);
    assert_eq!(done.enriched, 0);
    assert_eq!(done.hotspots.len(), snapshots[0].hotspots.len());
}

#[tokio::test]
async fn stop_mid_run_keeps_already_applied_patches() {
    let avocet = Avocet::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .pacing(PacingConfig {
            min_call_interval: Duration::from_millis(20),
            emit_every: 1,
        })
        .build()
        .unwrap();

    let (handle, mut rx) = avocet.search(params()).await.unwrap();
    let base = rx.recv().await.unwrap();
    let total = base.hotspots.len();
    assert!(total >= 3);

    // Let one enriching emission through, then stop.
    let first_progress = rx.recv().await.unwrap();
    assert_eq!(first_progress.phase, Phase::Enriching);
    handle.stop();

    let mut last = first_progress;
    while let Some(s) = rx.recv().await {
        last = s;
    }
    assert_eq!(last.phase, Phase::Done);
    assert!(last.enriched >= 1, "completed work is kept");
    assert!(last.enriched < total, "stop prevented the remaining dispatches");
}

#[tokio::test]
async fn handle_reports_finished_after_the_final_snapshot() {
    let avocet = Avocet::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .pacing(helpers::quick_pacing())
        .build()
        .unwrap();

    let (handle, rx) = avocet.search(params()).await.unwrap();
    let _ = drain(rx).await;
    // The channel closed, so the task is done or one poll from it.
    tokio::task::yield_now().await;
    assert!(handle.is_finished());
}

#[tokio::test]
async fn dropping_the_receiver_does_not_wedge_the_task() {
    let avocet = Avocet::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .pacing(helpers::quick_pacing())
        .build()
        .unwrap();

    let (handle, rx) = avocet.search(params()).await.unwrap();
    drop(rx);
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !handle.is_finished() {
        assert!(tokio::time::Instant::now() < deadline, "task wedged");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
