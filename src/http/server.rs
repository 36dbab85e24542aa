//! HTTP server setup and connection serving.
//!
//! # Responsibilities
//! - Create the Axum Router with its single fallback handler
//! - Configure hyper's HTTP/1.1 and HTTP/2 connection builder
//! - Run the accept loop, one task per connection
//! - Drain connections on shutdown

use axum::Router;
use hyper_util::{
    rt::{TokioExecutor, TokioIo, TokioTimer},
    server::{conn::auto::Builder, graceful::GracefulShutdown},
    service::TowerToHyperService,
};
use std::io;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::http::response::respond_ok;
use crate::net::{ConnectionTracker, Listener, ListenerError};

const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Error type for the serving loop.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("listener address unavailable: {0}")]
    LocalAddr(#[source] io::Error),
}

/// HTTP server answering every request with the fixed response.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            router: Self::build_router(),
            config,
        }
    }

    /// Any method, any path: every request lands on the fallback.
    fn build_router() -> Router {
        Router::new()
            .fallback(respond_ok)
            .layer(TraceLayer::new_for_http())
    }

    /// The router requests are dispatched to.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    fn connection_builder(&self) -> Builder<TokioExecutor> {
        let mut builder = Builder::new(TokioExecutor::new());
        builder
            .http1()
            .keep_alive(self.config.http.keep_alive)
            .timer(TokioTimer::new())
            .header_read_timeout(self.config.http.header_read_timeout());
        builder
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires, then drain open connections.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;
        tracing::info!(
            address = %addr,
            max_connections = listener.max_connections(),
            keep_alive = self.config.http.keep_alive,
            "HTTP server starting"
        );

        let builder = self.connection_builder();
        let graceful = GracefulShutdown::new();
        let tracker = ConnectionTracker::new();

        loop {
            let (stream, peer_addr, permit) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(connection) => connection,
                    Err(ListenerError::Accept(e)) => {
                        handle_accept_error(e).await;
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                },
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting connections");
                    break;
                }
            };

            let guard = tracker.track();
            let service = TowerToHyperService::new(self.router.clone());
            let connection = builder.serve_connection_with_upgrades(TokioIo::new(stream), service);
            let connection = graceful.watch(connection.into_owned());

            tokio::spawn(async move {
                let _permit = permit;
                tracing::trace!(connection_id = %guard.id(), peer_addr = %peer_addr, "Serving connection");
                if let Err(e) = connection.await {
                    tracing::debug!(
                        connection_id = %guard.id(),
                        peer_addr = %peer_addr,
                        error = %e,
                        "Connection ended with error"
                    );
                }
            });
        }

        // Release the port before draining.
        drop(listener);

        tracing::info!(
            active_connections = tracker.active_count(),
            "Draining connections"
        );
        tokio::select! {
            _ = graceful.shutdown() => {
                tracing::info!("All connections closed");
            }
            _ = tokio::time::sleep(self.config.timeouts.shutdown()) => {
                tracing::warn!(
                    remaining = tracker.active_count(),
                    "Drain timed out, abandoning remaining connections"
                );
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn handle_accept_error(error: io::Error) {
    if is_connection_error(&error) {
        tracing::debug!(error = %error, "Client went away before accept");
        return;
    }
    // Typically EMFILE/ENFILE.
    tracing::error!(error = %error, "Accept failed");
    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
}

fn is_connection_error(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
    )
}
