//! Command line interface.

use clap::Parser;

use crate::config::{LogFormat, ServerConfig};

#[derive(Debug, Parser)]
#[command(name = "ok-server")]
#[command(about = "HTTP server that answers every request with 200 OK", long_about = None)]
pub struct Cli {
    /// Host name or IP address to listen on [default: 127.0.0.1]
    #[arg(long, env = "OK_SERVER_HOST")]
    pub host: Option<String>,

    /// TCP port to listen on [default: 3000]
    #[arg(short, long, env = "OK_SERVER_PORT")]
    pub port: Option<u16>,

    /// Length of the accept queue [default: 100]
    #[arg(long)]
    pub backlog: Option<u32>,

    /// Maximum concurrent connections [default: 10000]
    #[arg(long)]
    pub max_connections: Option<usize>,

    /// Runtime worker threads [default: one per core]
    #[arg(short, long, env = "OK_SERVER_WORKERS")]
    pub workers: Option<usize>,

    /// Close each connection after its response
    #[arg(long)]
    pub no_keep_alive: bool,

    /// Time allowed to receive a request head, in milliseconds [default: 30000]
    #[arg(long)]
    pub header_timeout_ms: Option<u64>,

    /// Time allowed for connections to drain on shutdown, in seconds [default: 10]
    #[arg(long)]
    pub shutdown_timeout_secs: Option<u64>,

    /// Log level, overridden by RUST_LOG [default: info]
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Overlay the given flags onto the default configuration.
    pub fn into_config(self) -> ServerConfig {
        let mut config = ServerConfig::default();

        if let Some(host) = self.host {
            config.listener.host = host;
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(backlog) = self.backlog {
            config.listener.backlog = backlog;
        }
        if let Some(max_connections) = self.max_connections {
            config.listener.max_connections = max_connections;
        }
        if self.workers.is_some() {
            config.runtime.worker_threads = self.workers;
        }
        if self.no_keep_alive {
            config.http.keep_alive = false;
        }
        if let Some(timeout) = self.header_timeout_ms {
            config.http.header_read_timeout_ms = timeout;
        }
        if let Some(secs) = self.shutdown_timeout_secs {
            config.timeouts.shutdown_secs = secs;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }

        config
    }
}
