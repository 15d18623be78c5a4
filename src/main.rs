use beluga_tracker::{
    config::Config, fleet, logging, BelugaTracker, FleetStatus, FlightFilters, Fr24Client,
    PhotoLookup, DEFAULT_PHOTO_LIMIT,
};
use color_eyre::Result;
use serde_json::json;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let config = Config::load();
    let _log_guard = logging::initialize_logging(&config.logging);

    let provider = Fr24Client::new(&config.provider)?;
    let tracker = BelugaTracker::initialize(provider, &config.tracker).await?;

    let flights = tracker.query_flights(&FlightFilters::default()).await?;
    let status = FleetStatus::from_records(&flights);
    info!(
        "Fleet status: {} tracked, {} enroute, {} on ground, {} unknown",
        status.total, status.enroute, status.on_ground, status.unknown
    );

    let photos = PhotoLookup::new(&config.photos)?
        .get_images(None, DEFAULT_PHOTO_LIMIT)
        .await?;

    let fleet_path = config
        .fleet
        .data_path
        .clone()
        .unwrap_or_else(fleet::bundled_fleet_path);
    let fleet_data = fleet::load_fleet_data(&fleet_path)?;

    let snapshot = json!({
        "status": status,
        "flights": flights,
        "photos": photos,
        "fleet": fleet_data,
    });
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
