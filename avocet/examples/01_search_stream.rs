mod common;
use avocet::{Avocet, Phase, sorted};
use avocet_core::{Location, SearchParams, SortBy};
use common::get_connectors;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();
    // 1. Build the orchestrator with whatever connectors are available.
    let mut builder = Avocet::builder();
    for connector in get_connectors() {
        builder = builder.with_connector(connector);
    }
    let avocet = builder.build()?;

    // 2. Search around Ithaca, NY and consume the snapshot stream.
    let params = SearchParams {
        origin: Location::new(42.44, -76.50),
        radius_km: 25.0,
        max_results: 20,
        back_days: 14,
        sort_by: SortBy::Species,
    };
    let (_handle, mut rx) = avocet.search(params).await?;

    let mut done = None;
    while let Some(snapshot) = rx.recv().await {
        println!(
            "[{:?}] {} hotspots, {} enriched, {} failed",
            snapshot.phase,
            snapshot.hotspots.len(),
            snapshot.enriched,
            snapshot.failed.len()
        );
        if snapshot.phase == Phase::Done {
            done = Some(snapshot);
        }
    }

    // 3. Sort the finished snapshot by recent species richness.
    let Some(done) = done else {
        return Ok(());
    };
    for hotspot in sorted(done.hotspots, params.sort_by).iter().take(10) {
        println!(
            "{:>5.1} km  {:<28} species: {:<3} notable: {}",
            hotspot.origin_distance_km,
            hotspot.name,
            hotspot
                .recent_species_count
                .map_or_else(|| "?".to_string(), |n| n.to_string()),
            hotspot.has_notable_species.unwrap_or(false),
        );
    }

    Ok(())
}
