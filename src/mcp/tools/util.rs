//! Shared utilities for MCP tool handlers.

use rmcp::model::{CallToolResult, Content, JsonObject};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Deserialize raw tool arguments into the handler's input struct.
///
/// Missing arguments are treated as an empty object so that tools whose
/// parameters are all optional accept a bare call.
///
/// # Errors
///
/// Returns `invalid_params` when the arguments do not match the input shape.
pub fn parse_input<T: DeserializeOwned>(
    tool: &str,
    arguments: Option<JsonObject>,
) -> Result<T, rmcp::ErrorData> {
    let args = arguments.unwrap_or_default();
    serde_json::from_value(serde_json::Value::Object(args)).map_err(|err| {
        rmcp::ErrorData::invalid_params(format!("invalid {tool} parameters: {err}"), None)
    })
}

/// Wrap a response payload as a JSON tool result.
///
/// `is_error` marks the result as an in-band failure; the payload still
/// carries the structured body.
///
/// # Errors
///
/// Returns `internal_error` if the payload fails to serialize.
pub fn json_result<T: Serialize>(
    tool: &str,
    payload: &T,
    is_error: bool,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let content = Content::json(payload).map_err(|err| {
        rmcp::ErrorData::internal_error(
            format!("failed to serialize {tool} response: {err}"),
            None,
        )
    })?;

    if is_error {
        Ok(CallToolResult::error(vec![content]))
    } else {
        Ok(CallToolResult::success(vec![content]))
    }
}
