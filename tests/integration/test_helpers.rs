//! Shared test helpers for integration tests.
//!
//! Provides reusable construction of `GlobalConfig`, `AppState` over a
//! throwaway database file, an HTTP server on an ephemeral port, and a
//! minimal streamable-HTTP MCP client.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use note_taker::config::GlobalConfig;
use note_taker::mcp::handler::AppState;
use note_taker::mcp::http::{bind_http, serve_http};
use note_taker::persistence::db;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Build a `GlobalConfig` bound to loopback on port 0 with its database
/// at `db_path`.
pub fn test_config(db_path: &Path) -> GlobalConfig {
    GlobalConfig {
        host: "127.0.0.1".into(),
        http_port: 0,
        db_path: db_path.to_path_buf(),
        ..GlobalConfig::default()
    }
}

/// Build an `AppState` over a fresh database file inside a new tempdir.
///
/// The returned `TempDir` must be kept alive for the duration of the test.
pub async fn test_app_state() -> (Arc<AppState>, TempDir) {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = test_config(&temp.path().join("notes.db"));
    let state = app_state_for(config).await;
    (state, temp)
}

/// Open the database described by `config` and wrap it in an `AppState`.
pub async fn app_state_for(config: GlobalConfig) -> Arc<AppState> {
    let database = Arc::new(db::connect(&config).await.expect("db connect"));
    Arc::new(AppState::new(Arc::new(config), database))
}

/// Spawn the HTTP transport on an ephemeral port, returning its base URL.
///
/// Caller must cancel the token to shut the server down.
pub async fn spawn_http_server(state: Arc<AppState>) -> (String, CancellationToken) {
    let listener = bind_http(&state.config).await.expect("bind ephemeral");
    let port = listener.local_addr().expect("local addr").port();
    let ct = CancellationToken::new();

    let server_ct = ct.clone();
    tokio::spawn(async move {
        let _ = serve_http(listener, state, server_ct).await;
    });

    (format!("http://127.0.0.1:{port}"), ct)
}

/// Extract the JSON-RPC payload from a plain JSON or `text/event-stream` body.
///
/// For SSE, the first non-empty `data:` line holds the message.
fn decode_body(content_type: &str, text: String) -> Value {
    let json_str = if content_type.contains("text/event-stream") || text.contains("\ndata:") {
        text.lines()
            .find_map(|line| {
                line.strip_prefix("data:")
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or("")
            .to_owned()
    } else {
        text
    };
    serde_json::from_str(&json_str).unwrap_or(Value::Null)
}

/// Streamable-HTTP MCP connection state.
///
/// Every request is a POST to `/mcp`. After `initialize` the server returns
/// an `Mcp-Session-Id` header that must accompany all later requests.
pub struct McpConnection {
    mcp_url: String,
    session_id: Option<String>,
    client: reqwest::Client,
    next_id: u64,
}

impl McpConnection {
    /// Create a new (uninitialized) connection to the `/mcp` endpoint.
    pub fn new(base_url: &str) -> Self {
        Self {
            mcp_url: format!("{base_url}/mcp"),
            session_id: None,
            client: reqwest::Client::new(),
            next_id: 1,
        }
    }

    /// Perform the `initialize` + `notifications/initialized` handshake.
    ///
    /// Returns the raw `initialize` response.
    pub async fn handshake(&mut self) -> Value {
        let init = self
            .request(
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "note-taker-test", "version": "0.0.1" }
                }),
            )
            .await;

        self.notify("notifications/initialized", json!({})).await;
        init
    }

    /// Send a JSON-RPC request and return the full response object.
    pub async fn request(&mut self, method: &str, params: Value) -> Value {
        let id = self.next_id;
        self.next_id += 1;

        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let mut req = self
            .client
            .post(&self.mcp_url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json, text/event-stream")
            .body(serde_json::to_string(&body).expect("serialize JSON-RPC"));

        if let Some(sid) = &self.session_id {
            req = req.header("mcp-session-id", sid.clone());
        }

        let response = req
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .expect("POST JSON-RPC");

        if self.session_id.is_none() {
            if let Some(sid) = response.headers().get("mcp-session-id") {
                self.session_id = sid.to_str().ok().map(ToOwned::to_owned);
            }
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_owned();
        let text = response.text().await.expect("response body");
        decode_body(&content_type, text)
    }

    /// Send a JSON-RPC notification (no id, no response expected).
    pub async fn notify(&self, method: &str, params: Value) {
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
        });

        let mut req = self
            .client
            .post(&self.mcp_url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json, text/event-stream")
            .body(serde_json::to_string(&body).expect("serialize notification"));

        if let Some(sid) = &self.session_id {
            req = req.header("mcp-session-id", sid.clone());
        }

        let _ = req.send().await;
    }

    /// Call a tool and return the full JSON-RPC response.
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Value {
        self.request("tools/call", json!({ "name": name, "arguments": arguments }))
            .await
    }

    /// List tools and return the full JSON-RPC response.
    pub async fn list_tools(&mut self) -> Value {
        self.request("tools/list", json!({})).await
    }
}

/// Parse the JSON body of the first text content item in a tool result.
pub fn tool_payload(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"]
        .as_str()
        .unwrap_or_else(|| panic!("text content in tool result: {response}"));
    serde_json::from_str(text).expect("tool result is JSON")
}

/// Whether a tool result was flagged as an in-band error.
pub fn is_tool_error(response: &Value) -> bool {
    response["result"]["isError"].as_bool().unwrap_or(false)
}
