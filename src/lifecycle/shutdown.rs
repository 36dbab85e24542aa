//! Shutdown coordination.
//!
//! One [`Shutdown`] is created per server. The accept loop subscribes to it;
//! the signal task fires it through [`Shutdown::trigger_when`].

use std::future::Future;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Broadcast handle that stops the accept loop and starts the drain.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the shutdown signal. Subscribers created afterwards miss it.
    pub fn trigger(&self) {
        match self.tx.send(()) {
            Ok(receivers) => tracing::debug!(receivers, "Shutdown triggered"),
            Err(_) => tracing::debug!("Shutdown triggered with nothing listening"),
        }
    }

    /// Spawn a task that triggers shutdown once `event` completes.
    ///
    /// The task yields whatever `event` produced, e.g. the signal received.
    pub fn trigger_when<F>(&self, event: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let shutdown = self.clone();
        tokio::spawn(async move {
            let output = event.await;
            shutdown.trigger();
            output
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
