//! `get_note` MCP tool handler.
//!
//! Exact-title lookup. A missing note is not an error: the payload carries
//! `found: false`.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolCallContext;
use rmcp::model::CallToolResult;
use tracing::{error, info, info_span, Instrument};

use crate::mcp::handler::NoteServer;
use crate::models::note::GetNoteResponse;

use super::util::{json_result, parse_input};

/// Input parameters for `get_note`.
#[derive(Debug, serde::Deserialize)]
struct GetNoteInput {
    /// Title to look up (case-sensitive).
    title: String,
}

/// Handle the `get_note` tool call.
///
/// # Errors
///
/// Returns `rmcp::ErrorData` only for malformed arguments or a response
/// that cannot be serialized.
pub async fn handle(
    context: ToolCallContext<'_, NoteServer>,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let state = Arc::clone(context.service.state());
    let cancel = context.request_context.ct.clone();
    let input: GetNoteInput = parse_input("get_note", context.arguments)?;

    let span = info_span!("get_note", title = %input.title);

    async move {
        let result = state.notes.get_content(&input.title, &cancel).await;
        if let Err(ref err) = result {
            error!(%err, "get_note failed");
        }

        let response = GetNoteResponse::from(result);
        info!(found = response.found, "get_note completed");
        json_result("get_note", &response, response.error.is_some())
    }
    .instrument(span)
    .await
}
