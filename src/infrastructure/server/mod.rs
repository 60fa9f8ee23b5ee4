//! Health-check HTTP server

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::application::errors::BotError;
use crate::application::state::{BotState, StatusSnapshot};

pub fn router(state: Arc<BotState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(state)
}

async fn root() -> &'static str {
    "OK"
}

async fn health(State(state): State<Arc<BotState>>) -> Json<StatusSnapshot> {
    Json(state.status())
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(addr: SocketAddr, state: Arc<BotState>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Health server listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Serve alongside the poll task until `shutdown` resolves.
///
/// The poll loop only ends on shutdown, so a poll task that finishes first
/// (panic included) is an error and takes the server down with it.
pub async fn serve_with_poller<F>(
    addr: SocketAddr,
    state: Arc<BotState>,
    mut poller: JoinHandle<()>,
    shutdown: F,
) -> Result<(), BotError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let outcome = tokio::select! {
        served = serve(addr, state.clone(), shutdown) => {
            served.map_err(|e| BotError::Internal(format!("Health server failed: {}", e)))
        }
        joined = &mut poller => {
            let reason = match joined {
                Ok(()) => "poll loop exited".to_string(),
                Err(e) => format!("poll task failed: {}", e),
            };
            tracing::error!("Poller died, shutting down: {}", reason);
            Err(BotError::Internal(reason))
        }
    };

    state.stop();
    poller.abort();
    outcome
}

/// Resolves on SIGTERM or SIGINT
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            tracing::warn!("Failed to install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Received SIGINT - shutting down");
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM - shutting down");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received SIGINT - shutting down");
        }
    }
}

#[cfg(not(unix))]
pub async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Received Ctrl-C - shutting down");
}
