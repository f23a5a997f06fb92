use clap::Parser;
use tracing_subscriber::EnvFilter;

use focusify_api::{cli::Cli, config, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, STORAGE_BACKEND, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.apply(config::config().clone());
    tracing::info!(
        "Starting Focusify API in {:?} mode with {:?} storage",
        config.environment,
        config.storage.backend
    );

    let (state, db) = server::build_state(config).await?;
    let listener = server::bind(&state.config.server).await?;

    server::serve(listener, state, server::shutdown_signal()).await?;

    if let Some(db) = db {
        db.close().await;
    }
    Ok(())
}
