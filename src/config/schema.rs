//! Configuration schema definitions.
//!
//! Every section has a `Default` so the server starts with no arguments on
//! `127.0.0.1:3000`.

use std::time::Duration;

/// Root configuration for the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listener configuration (address, backlog, connection limit).
    pub listener: ListenerConfig,

    /// HTTP connection settings.
    pub http: HttpConfig,

    /// Tokio runtime settings.
    pub runtime: RuntimeConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Host name or IP address to bind.
    pub host: String,

    /// TCP port. `0` lets the OS pick one.
    pub port: u16,

    /// Length of the kernel accept queue.
    pub backlog: u32,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl ListenerConfig {
    /// `host:port` as it should be resolved.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            backlog: 100,
            max_connections: 10_000,
        }
    }
}

/// HTTP connection settings handed to hyper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Keep HTTP/1 connections open between requests.
    pub keep_alive: bool,

    /// Time allowed for a client to send a full request head, in milliseconds.
    pub header_read_timeout_ms: u64,
}

impl HttpConfig {
    pub fn header_read_timeout(&self) -> Duration {
        Duration::from_millis(self.header_read_timeout_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            keep_alive: true,
            header_read_timeout_ms: 30_000,
        }
    }
}

/// Tokio runtime settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Worker thread count. `None` uses one thread per core.
    pub worker_threads: Option<usize>,
}

/// Timeout configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// How long in-flight connections may drain after shutdown, in seconds.
    pub shutdown_secs: u64,
}

impl TimeoutConfig {
    pub fn shutdown(&self) -> Duration {
        Duration::from_secs(self.shutdown_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { shutdown_secs: 10 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}
