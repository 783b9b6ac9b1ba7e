mod config;
mod db;
mod eapi;
mod handlers;
mod models;
mod router;
mod status;
mod tunnels;
mod utils;

use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use db::Store;
use eapi::{Connector, EapiConnector};
use status::StatusChecker;

/// Application state shared across handlers
pub struct AppState {
    pub store: Store,
    pub config: Config,
    pub connector: Arc<dyn Connector>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // Load configuration
    let cfg = Config::load();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cfg.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Arista Lab Console ({})", cfg.node_env);
    tracing::info!("Switch inventory: {}", cfg.switches_config);
    tracing::info!(
        "eAPI: protocol={} insecure_tls={} timeout={}s",
        cfg.eapi_protocol,
        cfg.eapi_insecure,
        cfg.eapi_timeout_secs
    );

    // Open (or create) the inventory file
    let store = Store::open(&cfg.switches_config).await?;

    let connector: Arc<dyn Connector> = Arc::new(EapiConnector::new(
        &cfg.eapi_protocol,
        cfg.eapi_insecure,
        cfg.eapi_timeout_secs,
    )?);

    // Initialize status checker
    let mut status_checker = StatusChecker::new(store.clone(), connector.clone(), cfg.status_interval_secs);
    status_checker.start();

    // Create app state
    let state = Arc::new(AppState {
        store,
        config: cfg.clone(),
        connector,
    });

    // Build router
    let frontend_dir = cfg.is_production().then_some(cfg.frontend_dir.as_str());
    if let Some(dir) = frontend_dir {
        tracing::info!("Serving frontend from {}", dir);
    }
    let app = router::build(state.clone(), frontend_dir);

    // Start server
    let listen_addr = state.config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!("Arista Lab Console listening on {}", listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    status_checker.stop();
    tracing::info!("Arista Lab Console shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => { sig.recv().await; }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
