//! Cache Proxy - A concurrent forwarding HTTP proxy
//!
//! Usage: `cache_proxy <port>`

use std::net::SocketAddr;
use std::process::ExitCode;

use anyhow::Context;
use clap::{error::ErrorKind, Parser};
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cache_proxy::api::{create_router, AppState};
use cache_proxy::cache::{shared, CacheStore, SharedCache};
use cache_proxy::{Cli, Config, ProxyServer};

/// Main entry point for the proxy.
///
/// # Startup Sequence
/// 1. Parse the port argument (usage error exits with status 1)
/// 2. Initialize tracing subscriber for logging
/// 3. Create the shared cache store
/// 4. Bind the proxy listener (failure exits with status 1)
/// 5. Start the admin API if `PROXY_ADMIN_PORT` is set
/// 6. Accept connections until SIGINT/SIGTERM, then tear the cache down
#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                return ExitCode::FAILURE;
            }
        },
    };

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cache_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env(&cli);
    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    info!(
        port = config.port,
        admin_port = ?config.admin_port,
        "Starting cache proxy"
    );

    let cache = shared(CacheStore::new());

    let server = ProxyServer::bind(SocketAddr::from(([0, 0, 0, 0], config.port)), cache.clone())
        .await
        .with_context(|| format!("Failed to listen on port {}", config.port))?;

    let admin_handle = match config.admin_port {
        Some(port) => Some(spawn_admin(port, cache.clone()).await?),
        None => None,
    };

    tokio::select! {
        _ = server.run() => {}
        _ = shutdown_signal() => {}
    }

    if let Some(handle) = admin_handle {
        handle.abort();
    }

    let (entries, bytes) = cache.lock().await.teardown();
    info!(entries, bytes, "Cache released, shutdown complete");
    Ok(())
}

/// Serves the admin router on its own listener.
async fn spawn_admin(port: u16, cache: SharedCache) -> anyhow::Result<JoinHandle<()>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind admin API on port {}", port))?;
    info!("Admin API listening on http://{}", addr);

    let app = create_router(AppState::new(cache));
    Ok(tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            warn!(error = %err, "Admin API stopped");
        }
    }))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
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
}
