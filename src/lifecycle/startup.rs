//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Initialize logging and the Tokio runtime
//! - Bind the listener, announce it, and serve until a shutdown signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds last (traffic only when ready)

use std::io;
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};
use tracing_subscriber::util::TryInitError;

use crate::config::{validate_config, RuntimeConfig, ServerConfig, ValidationError};
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::signals::ShutdownSignals;
use crate::lifecycle::Shutdown;
use crate::net::{Listener, ListenerError};
use crate::observability::init_logging;

/// Anything that stops the server from reaching the listening state.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {}", join_errors(.0))]
    Config(Vec<ValidationError>),

    #[error("failed to initialize logging: {0}")]
    Logging(#[from] TryInitError),

    #[error("failed to build runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("failed to install signal handlers: {0}")]
    Signals(#[source] io::Error),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the multi-threaded runtime the server runs on.
pub fn build_runtime(config: &RuntimeConfig) -> Result<Runtime, StartupError> {
    let mut builder = Builder::new_multi_thread();
    if let Some(threads) = config.worker_threads {
        builder.worker_threads(threads);
    }
    builder
        .thread_name("ok-server-worker")
        .enable_all()
        .build()
        .map_err(StartupError::Runtime)
}

/// Validate, set up logging and the runtime, then serve until shut down.
pub fn run(config: ServerConfig) -> Result<(), StartupError> {
    validate_config(&config).map_err(StartupError::Config)?;
    init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        address = %config.listener.address(),
        worker_threads = ?config.runtime.worker_threads,
        keep_alive = config.http.keep_alive,
        "ok-server starting"
    );

    let runtime = build_runtime(&config.runtime)?;
    runtime.block_on(start(config))?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Bind, announce the address on stdout, and serve.
///
/// Returns after a SIGINT/SIGTERM once open connections have drained.
pub async fn start(config: ServerConfig) -> Result<(), StartupError> {
    let mut signals = ShutdownSignals::install().map_err(StartupError::Signals)?;
    let listener = Listener::bind(&config.listener).await?;
    let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_when(async move { signals.recv().await });

    println!("Listening on http://{local_addr}");

    HttpServer::new(config).run(listener, server_shutdown).await?;
    Ok(())
}
