use std::sync::Arc;

use avocet_core::AvocetConnector;

/// Wire `tracing` output to stderr, honoring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Connectors for the examples: live eBird/OSRM/Open-Meteo when an eBird
/// API token is in the environment, the deterministic mock otherwise.
#[must_use]
pub fn get_connectors() -> Vec<Arc<dyn AvocetConnector>> {
    match std::env::var("AVOCET_EBIRD_TOKEN") {
        Ok(token) if !token.is_empty() => vec![
            Arc::new(avocet_ebird::EbirdConnector::new(token)),
            Arc::new(avocet_osm::OsrmConnector::new_default()),
            Arc::new(avocet_osm::NominatimConnector::new_default()),
            Arc::new(avocet_openmeteo::OpenMeteoConnector::new_default()),
        ],
        _ => {
            println!("--- (Using Mock Connector; set AVOCET_EBIRD_TOKEN for live data) ---");
            vec![Arc::new(avocet_mock::MockConnector::new())]
        }
    }
}
