use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use flightcheck::api::AppState;
use flightcheck::{AirportIndex, FlightCheckConfig, OpenWeatherClient, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = FlightCheckConfig::load().context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("flightcheck={}", config.logging.level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let api_key = config.require_api_key()?.to_string();

    // Both the empty-table and malformed-row cases are fatal here, before
    // the server accepts any request
    let airports = AirportIndex::load_csv(&config.airports.dataset_path)
        .with_context(|| format!("Failed to load {}", config.airports.dataset_path))?;

    let client = Arc::new(OpenWeatherClient::new(&config.weather, api_key)?);
    let state = AppState::new(Arc::new(airports), client.clone(), client)
        .with_waypoint_count(config.route.waypoint_count);

    web::run(state, config.server.port).await
}
