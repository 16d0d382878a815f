//! Streamable HTTP transport and liveness endpoint.
//!
//! Mounts an rmcp [`StreamableHttpService`] at `/mcp` behind an axum router.
//! `GET /` and `GET /health` report liveness for uptime probes without
//! opening an MCP session.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::{Json, Router};
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::handler::{AppState, NoteServer};
use crate::config::GlobalConfig;
use crate::{AppError, Result};

/// Path of the streamable HTTP MCP endpoint.
pub const MCP_PATH: &str = "/mcp";

/// How long open MCP streams may delay shutdown once cancellation fires.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Body returned by the liveness endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    /// Always `healthy` while the process is serving.
    pub status: String,
    /// MCP endpoints currently mounted.
    pub mcp_endpoints: Vec<String>,
    /// Human-readable banner.
    pub message: String,
}

/// Handler for `GET /` and `GET /health`.
async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".into(),
        mcp_endpoints: vec![MCP_PATH.into()],
        message: "Note Taker MCP is running!".into(),
    })
}

/// Bind the HTTP listener on `config.host:config.http_port`.
///
/// Kept separate from [`serve_http`] so a bind failure stops startup before
/// anything is served.
///
/// # Errors
///
/// Returns `AppError::Config` if the address is unavailable.
pub async fn bind_http(config: &GlobalConfig) -> Result<TcpListener> {
    let host = config.host.as_str();
    let port = config.http_port;
    TcpListener::bind((host, port))
        .await
        .map_err(|err| AppError::Config(format!("failed to bind HTTP on {host}:{port}: {err}")))
}

/// Build the axum router with the MCP service and liveness routes.
///
/// Each MCP session gets its own [`NoteServer`] sharing the same
/// [`AppState`].
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    let service = StreamableHttpService::new(
        move || Ok(NoteServer::new(Arc::clone(&state))),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig::default(),
    );

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .nest_service(MCP_PATH, service)
}

/// Serve the HTTP transport on an already-bound listener until `ct` fires.
///
/// # Errors
///
/// Returns `AppError::Io` if the server fails while running.
pub async fn serve_http(
    listener: TcpListener,
    state: Arc<AppState>,
    ct: CancellationToken,
) -> Result<()> {
    let local = listener
        .local_addr()
        .map_err(|err| AppError::Io(format!("listener has no local address: {err}")))?;
    info!(%local, path = MCP_PATH, "starting streamable HTTP MCP transport");

    let graceful = {
        let ct = ct.clone();
        async move { ct.cancelled().await }
    };
    let server = axum::serve(listener, router(state))
        .with_graceful_shutdown(graceful)
        .into_future();

    // Open SSE streams keep graceful shutdown waiting; bound it.
    let deadline = async {
        ct.cancelled().await;
        tokio::time::sleep(SHUTDOWN_GRACE).await;
    };

    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::Io(format!("HTTP server error: {err}")))?;
        }
        () = deadline => {
            warn!(grace = ?SHUTDOWN_GRACE, "open MCP streams did not close; forcing shutdown");
        }
    }

    info!("HTTP MCP transport shut down");
    Ok(())
}
