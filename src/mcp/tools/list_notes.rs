//! `list_notes` MCP tool handler.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolCallContext;
use rmcp::model::CallToolResult;
use tracing::{error, info, info_span, Instrument};

use crate::mcp::handler::NoteServer;
use crate::models::note::ListNotesResponse;

use super::util::{json_result, parse_input};

/// Input parameters for `list_notes`.
#[derive(Debug, serde::Deserialize)]
struct ListNotesInput {
    /// Substring every returned title must contain; empty keeps all.
    #[serde(default)]
    filter_text: String,
}

/// Handle the `list_notes` tool call.
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
    let input: ListNotesInput = parse_input("list_notes", context.arguments)?;

    let span = info_span!("list_notes", filter = %input.filter_text);

    async move {
        let result = state.notes.list_titles(&input.filter_text, &cancel).await;
        if let Err(ref err) = result {
            error!(%err, "list_notes failed");
        }

        let response = ListNotesResponse::from(result);
        info!(count = response.notes.len(), "list_notes completed");
        json_result("list_notes", &response, response.error.is_some())
    }
    .instrument(span)
    .await
}
