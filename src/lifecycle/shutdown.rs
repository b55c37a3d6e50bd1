//! Fan-out of the stop signal from the signal task to the HTTP server.

use tokio::sync::broadcast;

/// Cloneable handle that tells every subscriber to stop.
///
/// `lifecycle::run` hands one receiver to `HttpServer::run`; integration
/// tests hold a clone to stop a proxy they started.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A receiver that resolves once `trigger` is called.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscriber. A no-op when nobody is listening.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
