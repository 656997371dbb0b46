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

    let spots = [
        Location::new(42.44, -76.50),
        Location::new(42.48, -76.45),
        Location::new(42.55, -76.60),
    ];

    let summary = avocet.birding_weather(&spots).await?;
    println!(
        "birding outlook: {:?} (score {:.0}/100)",
        summary.rating, summary.average_score
    );
    println!(
        "avg temp {:.1} C, max wind {:.0} km/h, max precip {:.0}%",
        summary.average_temperature_c, summary.max_wind_speed, summary.max_precipitation_probability
    );

    Ok(())
}
