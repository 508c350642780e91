mod classifier;
mod config;
mod engine;
mod error;
mod http;
mod models;
mod store;

use config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config
    let config = AppConfig::load()?;

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .init();

    info!("Starting Binwatch Service...");

    // Init store
    let store = store::JsonStore::open(&config)?;
    info!("Data directory ready: {}", config.data_dir.display());

    let engine = engine::Engine::new(store, config.thresholds);

    // Start HTTP server
    http::serve(&config, engine).await?;

    Ok(())
}
