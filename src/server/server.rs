use anyhow::{Context, Result};
use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use super::websocket::ws_handler;
use super::{log_requests, metrics, state::*, ServerConfig};

/// Body returned by the health route.
pub const HOME_BODY: &str = "Relay server is running";

/// Path of the WebSocket upgrade route.
pub const WS_PATH: &str = "/ws";

async fn home() -> &'static str {
    HOME_BODY
}

/// Every origin, method and header is allowed, for plain HTTP and for the
/// WebSocket handshake alike.
fn make_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn make_app(config: ServerConfig, relay: GuardedRelay) -> Router {
    let state = ServerState { config, relay };

    Router::new()
        .route("/", get(home))
        .route(WS_PATH, get(ws_handler))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .layer(make_cors_layer())
        .with_state(state)
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received");
}

async fn run_metrics_server(host: String, port: u16) {
    let address = format!("{}:{}", host, port);
    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind metrics listener on {}: {}", address, e);
            return;
        }
    };

    info!("Metrics available at {}/metrics", address);
    if let Err(e) = axum::serve(listener, metrics::make_metrics_app()).await {
        error!("Metrics server stopped: {}", e);
    }
}

pub async fn run_server(config: ServerConfig, relay: GuardedRelay) -> Result<()> {
    let address = config.bind_address();

    if let Some(metrics_port) = config.metrics_port {
        tokio::spawn(run_metrics_server(config.host.clone(), metrics_port));
    }

    let app = make_app(config, relay);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;

    info!("Ready to serve at {}!", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server stopped with an error")
}
