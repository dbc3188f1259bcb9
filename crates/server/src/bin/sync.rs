//! Scheduled synchronizer entrypoint.
//!
//! Runs one full ingestion cycle and exits; a cron-style scheduler is
//! expected to invoke it periodically and to enforce non-overlap between
//! invocations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinelog_core::{
    load_config, rotate_log, validate_sync_config, MovieSource, MovieStore, SqliteStore,
    Synchronizer, TmdbClient,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("CINELOG_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_sync_config(&config).context("Configuration validation failed")?;

    // Rotate the scheduler's log before writing more to it.
    if let Some(ref log_path) = config.sync.log_path {
        match rotate_log(log_path, config.sync.max_log_size) {
            Ok(Some(archive)) => info!("Rotated sync log to {:?}", archive),
            Ok(None) => {}
            Err(e) => warn!("Log rotation failed, continuing: {}", e),
        }
    }

    let store: Arc<dyn MovieStore> = Arc::new(
        SqliteStore::new(&config.database.path).context("Failed to create movie store")?,
    );

    let tmdb_config = config
        .tmdb
        .clone()
        .context("tmdb section missing from configuration")?;
    let source: Arc<dyn MovieSource> =
        Arc::new(TmdbClient::new(tmdb_config).context("Failed to create TMDB client")?);

    let synchronizer = Synchronizer::new(store, source, config.sync.clone());

    let report = synchronizer
        .run()
        .await
        .context("Synchronizer run failed")?;

    info!(
        "Done: {} movies in the store, {} added this run over {} pages",
        report.final_total, report.newly_added, report.pages_fetched
    );

    Ok(())
}
