//! Mixer content API server.
//!
//! # Startup
//! ```text
//! config (first argument, MIXER_CONFIG, or defaults)
//!     → logging → metrics exporter (optional)
//!     → bind listener → serve
//!     → config watcher applies reloads until shutdown
//! ```

use std::path::PathBuf;

use tokio::net::TcpListener;

use mixer_api::config::watcher::{apply_reloads, ConfigWatcher};
use mixer_api::config::{load_config, ApiConfig};
use mixer_api::lifecycle::{wait_for_signal, Shutdown};
use mixer_api::observability::{logging, metrics};
use mixer_api::{AppState, HttpServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os("MIXER_CONFIG"))
        .map(PathBuf::from);

    let config = match &config_path {
        Some(path) => load_config(path)?,
        None => ApiConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "mixer-api starting");

    match &config_path {
        Some(path) => tracing::info!(path = ?path, "Configuration loaded"),
        None => tracing::warn!("No config file given; running with defaults"),
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        request_timeout_secs = config.timeouts.request_secs,
        sessions = config.auth.sessions.len(),
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let state = AppState::new(config);

    // Dropping the watcher handle stops the watch, so it lives until main returns.
    let _watcher = match &config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            match watcher.start() {
                Ok(handle) => {
                    tokio::spawn(apply_reloads(state.clone(), updates, shutdown.subscribe()));
                    Some(handle)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Config hot reload disabled");
                    None
                }
            }
        }
        None => None,
    };

    let server = HttpServer::from_state(state);
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
