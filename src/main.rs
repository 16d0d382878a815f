#![forbid(unsafe_code)]

//! `note-taker` — MCP note server binary.
//!
//! Bootstraps configuration, opens the notes database (creating the schema
//! before anything is served), then runs the selected MCP transport until a
//! shutdown signal arrives.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use note_taker::config::GlobalConfig;
use note_taker::mcp::handler::AppState;
use note_taker::mcp::{http, transport};
use note_taker::mode::TransportMode;
use note_taker::persistence::db;
use note_taker::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "note-taker", about = "MCP note-taking server", version, long_about = None)]
struct Cli {
    /// Optional path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Transport to serve the MCP tools over.
    #[arg(long, value_enum, default_value_t = TransportMode::Http)]
    transport: TransportMode,

    /// Override the notes database path.
    #[arg(long)]
    db: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("note-taker server bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = match args.config {
        Some(ref path) => GlobalConfig::load_from_path(path)?,
        None => GlobalConfig::default(),
    };
    config.apply_env_overrides()?;
    if let Some(db_path) = args.db {
        config.db_path = db_path;
    }

    let config = Arc::new(config);
    info!(
        host = %config.host,
        port = config.http_port,
        db_path = %config.db_path().display(),
        transport = ?args.transport,
        "configuration loaded"
    );

    // ── Initialize database (schema before any listener) ─
    let database = Arc::new(db::connect(&config).await?);
    let state = Arc::new(AppState::new(Arc::clone(&config), Arc::clone(&database)));

    // ── Start transport ─────────────────────────────────
    let ct = CancellationToken::new();
    let mut server_handle = match args.transport {
        TransportMode::Http => {
            let listener = http::bind_http(&config).await?;
            tokio::spawn(http::serve_http(listener, Arc::clone(&state), ct.clone()))
        }
        TransportMode::Stdio => {
            tokio::spawn(transport::serve_stdio(Arc::clone(&state), ct.clone()))
        }
    };

    info!("MCP server ready");

    // ── Wait for shutdown signal or transport exit ──────
    let finished = tokio::select! {
        () = shutdown_signal() => {
            info!("shutdown signal received");
            None
        }
        joined = &mut server_handle => Some(joined),
    };
    ct.cancel();

    let joined = match finished {
        Some(joined) => joined,
        None => server_handle.await,
    };
    let outcome = match joined {
        Ok(result) => result,
        Err(err) => Err(AppError::Io(format!("transport task panicked: {err}"))),
    };
    if let Err(ref err) = outcome {
        error!(%err, "transport exited with error");
    }

    database.close().await;
    info!("note-taker shut down");
    outcome
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

/// Logs always go to stderr: in stdio mode stdout carries the protocol.
fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
