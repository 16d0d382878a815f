#![forbid(unsafe_code)]

//! `note-taker` — an MCP server storing persistent, uniquely titled notes.
//!
//! The [`persistence::note_repo::NoteRepo`] store owns the `notes` table;
//! [`mcp`] exposes it as the `create_note`, `get_note` and `list_notes`
//! tools over streamable HTTP or stdio.

pub mod config;
pub mod errors;
pub mod mcp;
pub mod mode;
pub mod models;
pub mod persistence;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
