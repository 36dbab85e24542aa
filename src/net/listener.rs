//! TCP listener implementation with backpressure.
//!
//! # Responsibilities
//! - Resolve and bind the configured address with the configured backlog
//! - Classify bind failures (address in use, permission denied, bad address)
//! - Accept incoming TCP connections
//! - Enforce max_connections limit via semaphore

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::{lookup_host, TcpListener, TcpSocket, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The configured host could not be turned into a socket address.
    #[error("invalid listen address {address}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Another socket already listens on the address.
    #[error("failed to bind {0}: address already in use")]
    AddrInUse(SocketAddr),

    /// The process may not bind the address (e.g. privileged port).
    #[error("failed to bind {0}: permission denied")]
    PermissionDenied(SocketAddr),

    /// Any other bind or listen failure.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Failed to create the socket.
    #[error("failed to create socket: {0}")]
    Socket(#[source] io::Error),

    /// Failed to accept connection.
    #[error("failed to accept: {0}")]
    Accept(#[source] io::Error),

    /// The connection limit was shut down.
    #[error("connection limit closed")]
    Closed,
}

impl ListenerError {
    fn from_bind(addr: SocketAddr, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::AddrInUse => ListenerError::AddrInUse(addr),
            io::ErrorKind::PermissionDenied => ListenerError::PermissionDenied(addr),
            _ => ListenerError::Bind { addr, source },
        }
    }
}

/// A bounded TCP listener that limits concurrent connections.
///
/// Uses a semaphore to enforce `max_connections`. When the limit is reached,
/// new connections wait in the kernel backlog until a slot becomes available.
pub struct Listener {
    inner: TcpListener,
    connection_limit: Arc<Semaphore>,
    max_connections: usize,
}

impl Listener {
    /// Bind to the configured address with connection limits.
    ///
    /// Host names are resolved and the first address is used.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let address = config.address();
        let addr = lookup_host(address.as_str())
            .await
            .map_err(|source| ListenerError::InvalidAddress {
                address: address.clone(),
                source,
            })?
            .next()
            .ok_or_else(|| ListenerError::InvalidAddress {
                address: address.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "no addresses resolved"),
            })?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(ListenerError::Socket)?;

        // Same as `TcpListener::bind`. A live listener still yields EADDRINUSE.
        #[cfg(unix)]
        socket.set_reuseaddr(true).map_err(ListenerError::Socket)?;

        socket
            .bind(addr)
            .map_err(|e| ListenerError::from_bind(addr, e))?;
        let inner = socket
            .listen(config.backlog)
            .map_err(|e| ListenerError::from_bind(addr, e))?;

        let local_addr = inner.local_addr().map_err(ListenerError::Socket)?;

        tracing::info!(
            address = %local_addr,
            backlog = config.backlog,
            max_connections = config.max_connections,
            "Listener bound"
        );

        Ok(Self {
            inner,
            connection_limit: Arc::new(Semaphore::new(config.max_connections)),
            max_connections: config.max_connections,
        })
    }

    /// Accept a new connection, respecting the connection limit.
    ///
    /// Returns the stream and a permit that must be held for the connection's lifetime.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr, ConnectionPermit), ListenerError> {
        let permit = self
            .connection_limit
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ListenerError::Closed)?;

        let (stream, addr) = self.inner.accept().await.map_err(ListenerError::Accept)?;

        tracing::trace!(
            peer_addr = %addr,
            available_permits = self.connection_limit.available_permits(),
            "Connection accepted"
        );

        Ok((stream, addr, ConnectionPermit { _permit: permit }))
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, io::Error> {
        self.inner.local_addr()
    }

    /// Get current available connection slots.
    pub fn available_permits(&self) -> usize {
        self.connection_limit.available_permits()
    }

    /// Get configured maximum connections.
    pub fn max_connections(&self) -> usize {
        self.max_connections
    }
}

/// A permit representing a connection slot.
///
/// When dropped, the connection slot is released back to the pool.
#[derive(Debug)]
pub struct ConnectionPermit {
    _permit: OwnedSemaphorePermit,
}
