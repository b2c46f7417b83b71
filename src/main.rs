//! `Skycast` service entry point

use anyhow::{Context, Result};
use skycast::api::AppState;
use skycast::{SkycastConfig, Store, web};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = SkycastConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    tracing::info!("Starting skycast {}", skycast::VERSION);

    let store = Store::open(&config.store.location)
        .with_context(|| format!("Failed to open store at {}", config.store.location))?;

    let state = AppState::new(config, store)?;
    web::run(state).await
}
