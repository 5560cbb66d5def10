use anyhow::Context;
use orbital_api::telemetry;
use orbital_store::app_config::Config;
use orbital_store::DbClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = Config::load().context("Failed to load config")?;
    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to Postgres")?;

    db.migrate().await.context("Failed to run migrations")?;
    Ok(())
}
