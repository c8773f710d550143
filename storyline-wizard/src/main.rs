//! Storyline wizard (storyline-wizard) - Main entry point
//!
//! Serves the interview-to-blog wizard: upload, material extraction,
//! drafting, image and WordPress publish, behind a small login gate.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use storyline_common::auth::CredentialStore;
use storyline_common::config::{load_toml_config, LoggingConfig};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storyline_wizard::config::{config_file_path, resolve_config};
use storyline_wizard::{build_router, AppState};

/// Command-line arguments for storyline-wizard
#[derive(Parser, Debug)]
#[command(name = "storyline-wizard")]
#[command(about = "Interview to blog post wizard")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides [server] port)
    #[arg(short, long, env = "STORYLINE_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides [server] bind)
    #[arg(short, long)]
    bind: Option<String>,

    /// TOML configuration file
    #[arg(short, long, env = "STORYLINE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The log level lives in the config file; peek at it before tracing starts
    let log_level = config_file_path(args.config.as_deref())
        .and_then(|path| load_toml_config(&path).ok())
        .map(|c| c.logging.level)
        .unwrap_or_else(|| LoggingConfig::default().level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config =
        resolve_config(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    let credentials = CredentialStore::from_env();
    if credentials.is_empty() {
        warn!("No login accounts configured; set ADMIN_PASSWORD or STAFF_ACCOUNTS to allow logins");
    } else {
        info!("{} login account(s) configured", credentials.len());
    }

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address {}:{}",
                config.server.bind, config.server.port
            )
        })?;

    info!(
        "Starting storyline-wizard v{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    let state = AppState::from_config(config, credentials)
        .context("Failed to initialize stage services")?;
    let app = build_router(state);

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

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
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
