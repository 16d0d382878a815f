//! `create_note` MCP tool handler.
//!
//! Stores a new note under a title that must not already exist. Every
//! outcome, including duplicates and storage faults, is returned in-band as
//! a `{status, saved}` payload.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolCallContext;
use rmcp::model::CallToolResult;
use tracing::{error, info, info_span, warn, Instrument};

use crate::mcp::handler::NoteServer;
use crate::models::note::CreateNoteResponse;
use crate::AppError;

use super::util::{json_result, parse_input};

/// Input parameters for `create_note`.
#[derive(Debug, serde::Deserialize)]
struct CreateNoteInput {
    /// Unique note title.
    title: String,
    /// Note body.
    content: String,
}

/// Handle the `create_note` tool call.
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
    let input: CreateNoteInput = parse_input("create_note", context.arguments)?;

    let span = info_span!(
        "create_note",
        title = %input.title,
        content_len = input.content.len(),
    );

    async move {
        let result = state
            .notes
            .create(&input.title, &input.content, &cancel)
            .await;

        match &result {
            Ok(note) => info!(id = note.id, "note saved"),
            Err(AppError::Db(err)) => error!(%err, "create_note storage fault"),
            Err(err) => warn!(%err, "create_note rejected"),
        }

        let response = CreateNoteResponse::from(&result);
        json_result("create_note", &response, !response.saved)
    }
    .instrument(span)
    .await
}
