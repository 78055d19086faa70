//! Job Board Offline - proxy server fronting a job board
//!
//! Serves the job board through the offline worker and exposes the cached
//! job service and worker control endpoints.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobboard_offline::api::create_router;
use jobboard_offline::worker::HttpNetwork;
use jobboard_offline::{AppState, CleanupTask, Config};

/// Main entry point for the job board offline proxy.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the upstream client, the worker and the API cache
/// 4. Install and activate the worker
/// 5. Start background API cache cleanup task
/// 6. Create Axum router with all endpoints
/// 7. Start HTTP server on configured port
/// 8. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobboard_offline=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Board Offline Proxy");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: upstream={}, default_ttl={}ms, port={}, cleanup_interval={}s, cache_version={}",
        config.upstream_url,
        config.default_ttl_ms,
        config.server_port,
        config.cleanup_interval,
        config.cache_version
    );

    let network = HttpNetwork::new(
        &config.upstream_url,
        Duration::from_secs(config.upstream_timeout),
    )
    .context("failed to build upstream client")?;

    let state = AppState::from_config(&config, Arc::new(network))
        .context("failed to build application state")?;

    // An unreachable upstream at boot leaves the worker redundant; requests
    // are then passed straight through.
    match state.worker.start().await {
        Ok(deleted) => info!(deleted = deleted.len(), "Worker installed and activated"),
        Err(e) => error!(error = %e, "Worker install failed, serving without offline support"),
    }

    // Start background cleanup task
    let cleanup = CleanupTask::start(
        state.jobs.cache().clone(),
        Duration::from_secs(config.cleanup_interval),
    );
    info!("Background cleanup task started");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, stops the cleanup task and allows graceful shutdown.
async fn shutdown_signal(cleanup: CleanupTask) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cleanup.stop();
    warn!("Cleanup task stopped");
}
