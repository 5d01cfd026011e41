//! burrow-web - Family reading journal service
//!
//! Serves the JSON API for book shelves, audiobook journals, artwork
//! records, and the site visit counter over a shared SQLite database.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use burrow_common::config::ServiceConfig;
use burrow_web::services::{AudibleScraper, OpenLibraryClient};
use burrow_web::AppState;

/// Command-line arguments for burrow-web
///
/// Each flag overrides the matching `BURROW_*` environment variable and
/// config.toml key; `burrow_common::config` documents the tiers.
#[derive(Parser, Debug)]
#[command(name = "burrow-web")]
#[command(about = "Family reading journal service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Root folder holding the journal database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Upload key required on write requests (omit to leave writes open)
    #[arg(long)]
    upload_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "burrow_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!(
        "Starting Burrow Web (burrow-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE"),
    );

    let config = ServiceConfig::resolve(
        args.root_folder.as_deref(),
        args.port,
        args.upload_key.as_deref(),
    );
    info!("Root folder: {}", config.root_folder.display());

    config
        .ensure_root_folder()
        .context("Failed to initialize root folder")?;

    let db_path = config.database_path();
    info!("Database: {}", db_path.display());

    let db_pool = burrow_common::db::init_database(&db_path).await?;
    info!("Database connection established");

    let catalog = Arc::new(OpenLibraryClient::new().context("Failed to build catalog client")?);
    let audiobooks = Arc::new(AudibleScraper::new().context("Failed to build Audible scraper")?);

    if config.upload_key.is_some() {
        info!("Upload key configured; write routes gated");
    } else {
        info!("No upload key configured; write routes open");
    }
    if !config.persons.is_empty() {
        info!("Person roster: {}", config.persons.join(", "));
    }

    let state = AppState::new(
        db_pool,
        catalog,
        audiobooks,
        config.upload_key.clone(),
        config.persons.clone(),
    );

    let app = burrow_web::build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
