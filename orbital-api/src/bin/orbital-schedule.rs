use anyhow::Context;
use orbital_api::telemetry;
use orbital_core::ScheduleJob;
use orbital_store::app_config::Config;
use orbital_store::{DbClient, PgScheduleRepository, SpaceXClient};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Regenerates the weekly destination schedule for every active launchpad.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();
    tracing::info!("Initiating the schedule setup process for launchpads...");

    let config = Config::load().context("Failed to load config")?;

    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to Postgres")?;

    let directory = SpaceXClient::new(
        &config.launch_directory.base_url,
        config.launch_directory.timeout(),
    )
    .context("Failed to build launch directory client")?;

    let mut rng = match config.schedule.seed {
        Some(seed) => {
            tracing::info!("Using fixed schedule seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let job = ScheduleJob::new(
        Arc::new(directory),
        Arc::new(PgScheduleRepository::new(db.pool.clone())),
    );
    let report = job.run(&mut rng).await.context("Schedule generation failed")?;

    tracing::info!(
        "Schedule stored: {} launchpads, {} entries, generated at {}",
        report.launchpads,
        report.entries,
        report.generated_at
    );
    Ok(())
}
