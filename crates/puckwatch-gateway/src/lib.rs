// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server: the consumer half of the pushed broker mode.
//!
//! The external queue POSTs each task payload to `/` at its delivery time.
//! Outcome mapping follows the queue's retry rules: success *and* terminal
//! failures acknowledge with 200 (a poison payload must not be
//! redelivered), retryable failures return 503 so the queue backs off and
//! retries. `/health` serves container probes.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use puckwatch_core::{PuckwatchError, TaskFailure, TaskHandler};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The task handler shared with the pull-mode worker.
    pub handler: Arc<dyn TaskHandler>,
    /// Fires on graceful shutdown.
    pub cancel: CancellationToken,
}

/// Gateway server configuration (mirrors `GatewayConfig` from
/// puckwatch-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", post(post_task))
        .route("/health", get(get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway server and serve until the cancellation token fires.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), PuckwatchError> {
    let cancel = state.cancel.clone();
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PuckwatchError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| PuckwatchError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

/// Consume one pushed task payload.
async fn post_task(State(state): State<GatewayState>, body: Bytes) -> StatusCode {
    match state.handler.handle(&body, state.cancel.child_token()).await {
        Ok(()) => StatusCode::OK,
        Err(TaskFailure::Terminal(e)) => {
            // Acknowledge so the queue drops the poison payload.
            warn!(error = %e, "terminal task failure, acknowledging to stop redelivery");
            StatusCode::OK
        }
        Err(TaskFailure::Retryable(e)) => {
            warn!(error = %e, "retryable task failure, asking the queue to redeliver");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Liveness probe.
async fn get_health() -> &'static str {
    "OK"
}
