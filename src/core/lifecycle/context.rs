//! Cancellable context handed to entries

use tokio::sync::watch;

/// Observes the coordinator's cancellation
///
/// Cheap to clone; every clone observes the same cancellation. Entries use it
/// to stop background work once shutdown begins.
#[derive(Debug, Clone)]
pub struct CancelContext {
    rx: watch::Receiver<bool>,
}

impl CancelContext {
    pub(crate) fn new(rx: watch::Receiver<bool>) -> Self {
        Self { rx }
    }

    /// True once the context has been cancelled
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completes when the context is cancelled
    ///
    /// Also completes if the owning coordinator is dropped.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}
