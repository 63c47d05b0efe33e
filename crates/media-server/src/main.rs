//! Media catalog API server
//!
//! Serves the JSON catalog over HTTP on a loopback address.
//!
//! Usage:
//!   media-server --data-file media.json --bind 127.0.0.1:5000
//!
//! The catalog file is created empty on first start. A malformed catalog
//! aborts startup.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use media_core::Config;
use media_server::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "media-server")]
#[command(about = "Media catalog HTTP API")]
#[command(version)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog JSON file (overrides config)
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// Address to listen on (overrides config)
    #[arg(short, long)]
    bind: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = Config::load_with_cli_override(args.config.as_ref())
        .context("Failed to load configuration")?;
    if let Some(data_file) = args.data_file {
        config.data_file = data_file;
    }
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let store = media_server::open_store(&config)?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(
        "Media catalog listening on http://{} (catalog {:?})",
        listener.local_addr()?,
        config.data_file
    );

    media_server::serve(listener, AppState::new(store), shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Media catalog stopped");
    Ok(())
}

/// Resolve when Ctrl-C is received
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}

/// Initialize stderr logging
///
/// Level comes from MEDIA_LOG (then RUST_LOG), defaulting to info;
/// `--verbose` forces debug.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("media_core=debug,media_server=debug")
    } else {
        EnvFilter::try_from_env("MEDIA_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
