use anyhow::Context;
use orbital_api::{app, telemetry, AppState};
use orbital_store::app_config::Config;
use orbital_store::{DbClient, PgBookingRepository, PgScheduleRepository, SpaceXClient};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Orbital API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to Postgres")?;

    let directory = SpaceXClient::new(
        &config.launch_directory.base_url,
        config.launch_directory.timeout(),
    )
    .context("Failed to build launch directory client")?;

    tracing::info!(
        "Availability check: {:?}, empty list is 404: {}",
        config.booking.availability_check,
        config.booking.empty_list_not_found
    );

    let app_state = AppState::from_parts(
        Arc::new(PgScheduleRepository::new(db.pool.clone())),
        Arc::new(PgBookingRepository::new(db.pool.clone())),
        Arc::new(directory),
        &config.booking,
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app(app_state)).await?;

    Ok(())
}
