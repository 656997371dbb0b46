mod common;
use avocet::Avocet;
use avocet_core::Location;
use common::get_connectors;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();
    let mut builder = Avocet::builder();
    for connector in get_connectors() {
        builder = builder.with_connector(connector);
    }
    let avocet = builder.build()?;

    let origin = Location::new(42.44, -76.50);
    let destination = Location::new(43.05, -76.15);
    let candidates = [
        Location::new(42.48, -76.45),
        Location::new(42.55, -76.60),
        Location::new(42.90, -76.30),
        // Well off the Ithaca-Syracuse corridor.
        Location::new(43.16, -77.61),
    ];

    // Stops more than ~15 km of detour off the direct line are dropped
    // before the routing service is consulted.
    let trip = avocet
        .plan_trip(origin, &candidates, Some(destination), false, Some(15.0))
        .await?;

    println!(
        "trip: {:.1} km, {:.0} min, {} stops ({} skipped by corridor filter)",
        trip.distance_meters / 1000.0,
        trip.duration_seconds / 60.0,
        trip.stops.len(),
        trip.skipped.len()
    );
    for (i, stop) in trip.stops.iter().enumerate() {
        println!("  stop {}: {:.4}, {:.4}", i + 1, stop.latitude, stop.longitude);
    }

    Ok(())
}
