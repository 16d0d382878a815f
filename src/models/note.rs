//! Note model and the structured payloads returned by the note tools.
//!
//! A note is a `(title, content)` record. The title is the public key and is
//! unique across the store; the numeric `id` is assigned by `SQLite` and only
//! reflects insertion order.

use serde::{Deserialize, Serialize};

use crate::{AppError, Result};

/// Text placed in `content` when a lookup misses.
///
/// Retained for callers that only read `content`; [`GetNoteResponse::found`]
/// is the authoritative signal.
pub const NOT_FOUND_MESSAGE: &str = "Note not found.";

/// A persisted note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    /// Monotonically increasing row identifier.
    pub id: i64,
    /// Unique, case-sensitive title.
    pub title: String,
    /// Free-form body text; may be empty.
    pub content: String,
}

/// Reject titles that are empty or consist only of whitespace.
///
/// The title itself is stored verbatim; this check never trims it.
///
/// # Errors
///
/// Returns `AppError::Validation` when the title carries no visible text.
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".into()));
    }
    Ok(())
}

/// Result payload of `create_note`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateNoteResponse {
    /// Human-readable confirmation or `Error: ...` message.
    pub status: String,
    /// `true` only when a new row was committed.
    pub saved: bool,
}

impl CreateNoteResponse {
    /// Confirmation for a committed note.
    #[must_use]
    pub fn saved(title: &str) -> Self {
        Self {
            status: format!("Note '{title}' saved successfully."),
            saved: true,
        }
    }

    /// Rejection carrying the reason the note was not stored.
    #[must_use]
    pub fn failed(err: &AppError) -> Self {
        Self {
            status: format!("Error: {err}"),
            saved: false,
        }
    }
}

impl From<&Result<Note>> for CreateNoteResponse {
    fn from(result: &Result<Note>) -> Self {
        match result {
            Ok(note) => Self::saved(&note.title),
            Err(err) => Self::failed(err),
        }
    }
}

/// Result payload of `get_note`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetNoteResponse {
    /// Note body when found, otherwise [`NOT_FOUND_MESSAGE`] or an error text.
    pub content: String,
    /// Whether a note with the requested title exists.
    pub found: bool,
    /// Storage fault description, present only when the lookup failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GetNoteResponse {
    /// Payload for a successful lookup.
    #[must_use]
    pub fn found(content: String) -> Self {
        Self {
            content,
            found: true,
            error: None,
        }
    }

    /// Payload for a title that does not exist.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            content: NOT_FOUND_MESSAGE.to_owned(),
            found: false,
            error: None,
        }
    }

    /// Payload for a lookup that could not be completed.
    #[must_use]
    pub fn failed(err: &AppError) -> Self {
        Self {
            content: format!("Error: {err}"),
            found: false,
            error: Some(err.to_string()),
        }
    }
}

impl From<Result<Option<String>>> for GetNoteResponse {
    fn from(result: Result<Option<String>>) -> Self {
        match result {
            Ok(Some(content)) => Self::found(content),
            Ok(None) => Self::not_found(),
            Err(err) => Self::failed(&err),
        }
    }
}

/// Result payload of `list_notes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListNotesResponse {
    /// Matching titles in insertion order.
    pub notes: Vec<String>,
    /// Storage fault description, present only when the query failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<Vec<String>>> for ListNotesResponse {
    fn from(result: Result<Vec<String>>) -> Self {
        match result {
            Ok(notes) => Self { notes, error: None },
            Err(err) => Self {
                notes: Vec::new(),
                error: Some(err.to_string()),
            },
        }
    }
}
