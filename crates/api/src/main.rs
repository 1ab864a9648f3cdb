use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use craftbook_wowhead::{CachingResolver, WowheadApi, WowheadResolver};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use craftbook_api::config::ServerConfig;
use craftbook_api::router::build_app_router;
use craftbook_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "craftbook_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Store ---
    let store = craftbook_db::create_store(&config.redis_url)
        .await
        .expect("Failed to connect to store");

    craftbook_db::health_check(store.as_ref())
        .await
        .expect("Store health check failed");
    tracing::info!("Store health check passed");

    // --- Wowhead resolver ---
    let api = WowheadApi::new(&config.wowhead).expect("Failed to build Wowhead HTTP client");
    let defaults = config.wowhead.defaults.clone();
    let metadata = Arc::new(WowheadResolver::new(api.clone(), defaults.clone()));
    let resolver = Arc::new(CachingResolver::new(
        WowheadResolver::new(api, defaults.clone()),
        Arc::clone(&store),
        config.xref_cache_ttl_secs,
        defaults,
    ));
    tracing::info!(
        host = %config.wowhead.defaults.host,
        edition = %config.wowhead.defaults.edition,
        locale = %config.wowhead.defaults.locale,
        "Wowhead resolver ready",
    );

    // --- App state ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        resolver,
        metadata,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    // Bound the drain once a shutdown signal has been received.
    let drain_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    tokio::select! {
        result = server => result.expect("Server error"),
        () = async {
            shutdown_signal().await;
            tokio::time::sleep(drain_timeout).await;
        } => {
            tracing::warn!(timeout_secs = config.shutdown_timeout_secs, "Shutdown drain timed out");
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
