//! Transport mode — how MCP clients reach the server.
//!
//! `TransportMode` is used as the `--transport` CLI flag value. It determines
//! which transport the server initialises at startup.

use clap::ValueEnum;

/// Transport the MCP tools are served over.
///
/// Defaults to [`TransportMode::Http`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, ValueEnum)]
pub enum TransportMode {
    /// Streamable HTTP on `/mcp` plus the liveness endpoint. Default mode.
    #[default]
    Http,
    /// Single client over stdin/stdout.
    Stdio,
}
