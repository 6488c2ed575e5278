mod routes;
mod shutdown;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ical_import_core::ImportConfig;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::state::AppState;

const DEFAULT_LOG_FILTER: &str = "ical_import=info,ical_import_core=info,tower_http=info";

/// Serve bookings imported from a remote iCalendar feed
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// TOML config file (settings can also come from ICAL_IMPORT_* variables)
    #[arg(long, env = "ICAL_IMPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the configured one
    #[arg(long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config =
        ImportConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(listen) = args.listen {
        config.listen = listen;
    }

    let state = AppState::new(&config)?;
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;
    info!(addr = %config.listen, feed = %config.feed.url, "ical-import listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    info!("ical-import stopped");
    Ok(())
}
