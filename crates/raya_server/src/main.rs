//! Raya - tic-tac-toe game server.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use raya_server::{
    AppState, Cli, Command, CorsPolicy, GameService, GameStore, MemoryGameStore, ServerConfig,
    SqliteGameStore, router,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            port,
            host,
            memory,
        } => {
            let config = ServerConfig::load(config.as_deref())?.with_bind(host, port);
            init_tracing(&config);
            serve(config, memory).await
        }
        Command::Migrate { config } => {
            let config = ServerConfig::load(config.as_deref())?;
            init_tracing(&config);
            migrate(&config)
        }
    }
}

fn init_tracing(config: &ServerConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level())),
        )
        .init();
}

/// Run the HTTP game server
#[instrument(skip_all, fields(addr = %config.bind_address(), memory = memory))]
async fn serve(config: ServerConfig, memory: bool) -> Result<()> {
    let store: Arc<dyn GameStore> = if memory {
        warn!("Using in-memory store; games are lost on exit");
        Arc::new(MemoryGameStore::new())
    } else {
        let db_path = config.database_url().clone();
        let store = tokio::task::spawn_blocking(move || SqliteGameStore::open(db_path))
            .await
            .context("Database setup task failed")??;
        Arc::new(store)
    };

    let service = GameService::new(
        store,
        config.opponent().selector(),
        *config.automated_side(),
    );
    let cors = CorsPolicy::new(config.cors_origin())
        .with_context(|| format!("Invalid CORS origin '{}'", config.cors_origin()))?;
    let app = router(AppState::new(Arc::new(service)), cors);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    info!("Server ready at http://{}/", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Apply migrations and exit
#[instrument(skip_all, fields(database = %config.database_url()))]
fn migrate(config: &ServerConfig) -> Result<()> {
    SqliteGameStore::open(config.database_url().clone())?;
    info!("Database is up to date");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
