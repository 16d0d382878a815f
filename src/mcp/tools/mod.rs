//! MCP tool handlers.

pub mod create_note;
pub mod get_note;
pub mod list_notes;
pub mod util;
