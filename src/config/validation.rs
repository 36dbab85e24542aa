//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (clap handles syntactic)
//! - Validate value ranges (backlog > 0, timeouts > 0, connection limit fits a semaphore)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before the listener is bound

use thiserror::Error;
use tokio::sync::Semaphore;

use crate::config::schema::ServerConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener host must not be empty")]
    EmptyHost,

    #[error("listener backlog must be at least 1")]
    ZeroBacklog,

    #[error("max_connections must be at least 1")]
    ZeroMaxConnections,

    #[error("max_connections must be at most {max}, got {got}")]
    MaxConnectionsTooLarge { got: usize, max: usize },

    #[error("worker thread count must be at least 1")]
    ZeroWorkerThreads,

    #[error("header read timeout must be greater than 0 ms")]
    ZeroHeaderReadTimeout,

    #[error("unknown log level `{0}`")]
    UnknownLogLevel(String),
}

/// Check the configuration, collecting every error found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }
    if config.listener.backlog == 0 {
        errors.push(ValidationError::ZeroBacklog);
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    } else if config.listener.max_connections > Semaphore::MAX_PERMITS {
        errors.push(ValidationError::MaxConnectionsTooLarge {
            got: config.listener.max_connections,
            max: Semaphore::MAX_PERMITS,
        });
    }
    if config.runtime.worker_threads == Some(0) {
        errors.push(ValidationError::ZeroWorkerThreads);
    }
    if config.http.header_read_timeout_ms == 0 {
        errors.push(ValidationError::ZeroHeaderReadTimeout);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
