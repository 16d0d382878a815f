//! MCP server handler, shared application state, and tool router.

use std::future::Future;
use std::sync::Arc;

use rmcp::handler::server::{
    tool::{ToolCallContext, ToolRoute, ToolRouter},
    ServerHandler,
};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use tracing::{info_span, Instrument};

use crate::config::GlobalConfig;
use crate::persistence::db::Database;
use crate::persistence::note_repo::NoteRepo;

/// Name reported in the MCP `initialize` handshake.
pub const SERVER_NAME: &str = "note-taker";

/// Names of every tool the server registers, in listing order.
pub const TOOL_NAMES: [&str; 3] = ["create_note", "get_note", "list_notes"];

/// Shared application state accessible by all MCP tool handlers.
///
/// Built once at startup and shared through an `Arc`; each test builds its
/// own instance over an independent database.
pub struct AppState {
    /// Global configuration.
    pub config: Arc<GlobalConfig>,
    /// `SQLite` connection pool.
    pub db: Arc<Database>,
    /// Note store over `db`.
    pub notes: NoteRepo,
}

impl AppState {
    /// Bundle configuration and database into shared state.
    #[must_use]
    pub fn new(config: Arc<GlobalConfig>, db: Arc<Database>) -> Self {
        let notes = NoteRepo::new(Arc::clone(&db));
        Self { config, db, notes }
    }
}

/// MCP server implementation that exposes the note tools.
#[derive(Clone)]
pub struct NoteServer {
    state: Arc<AppState>,
}

impl NoteServer {
    /// Create a new MCP server bound to shared application state.
    #[must_use]
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Access the shared application state.
    #[must_use]
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    fn tool_router() -> ToolRouter<Self> {
        let mut router = ToolRouter::new();
        for tool in Self::all_tools() {
            let name = tool.name.to_string();
            let route = match name.as_str() {
                "create_note" => ToolRoute::new_dyn(tool, |context| {
                    Box::pin(crate::mcp::tools::create_note::handle(context))
                }),
                "get_note" => ToolRoute::new_dyn(tool, |context| {
                    Box::pin(crate::mcp::tools::get_note::handle(context))
                }),
                "list_notes" => ToolRoute::new_dyn(tool, |context| {
                    Box::pin(crate::mcp::tools::list_notes::handle(context))
                }),
                _ => continue,
            };
            router.add_route(route);
        }
        router
    }

    /// Convert a `serde_json::Value::Object` into the `Arc<Map>` expected by `Tool`.
    fn schema(value: serde_json::Value) -> Arc<serde_json::Map<String, serde_json::Value>> {
        match value {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::default()),
        }
    }

    /// Tool descriptors advertised through `tools/list`.
    #[must_use]
    pub fn all_tools() -> Vec<Tool> {
        vec![
            Tool::new(
                "create_note",
                "Create a new persistent note. Fails if a note with the same title already exists.",
                Self::schema(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "minLength": 1 },
                        "content": { "type": "string" }
                    },
                    "required": ["title", "content"]
                })),
            ),
            Tool::new(
                "get_note",
                "Retrieve a note's content by its exact title.",
                Self::schema(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" }
                    },
                    "required": ["title"]
                })),
            ),
            Tool::new(
                "list_notes",
                "List saved note titles in creation order, optionally keeping only \
                 titles that contain filter_text (case-insensitive).",
                Self::schema(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "filter_text": { "type": "string", "default": "" }
                    }
                })),
            ),
        ]
    }
}

impl ServerHandler for NoteServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "Persistent notes keyed by unique title. Use create_note to save, \
                 get_note to read one note, and list_notes to browse or search titles."
                    .into(),
            ),
            ..ServerInfo::default()
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, rmcp::ErrorData>> + Send + '_ {
        let router = Self::tool_router();
        let span = info_span!("call_tool", tool = %request.name);

        async move {
            router
                .call(ToolCallContext::new(self, request, context))
                .await
        }
        .instrument(span)
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, rmcp::ErrorData>> + Send + '_ {
        let tools = Self::all_tools();

        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }
}
