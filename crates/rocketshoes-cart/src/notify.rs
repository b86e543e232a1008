//! # Notifications
//!
//! Rejected or failed cart operations surface as toasts. The store hands
//! each one to a [`Notifier`]; what happens next belongs to the front end.
//!
//! ```text
//! CartStore ──► Notifier::notify(op, notice)
//!                  ├── ToastChannel  → broadcast to every subscriber
//!                  └── NoOpNotifier  → dropped
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use rocketshoes_core::{Notice, Operation};

/// Receives the notice for every failed operation.
pub trait Notifier: Send + Sync {
    fn notify(&self, operation: Operation, notice: Notice);
}

/// Discards notices.
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&self, _operation: Operation, _notice: Notice) {}
}

/// A notice paired with the operation that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub operation: Operation,
    pub notice: Notice,
}

/// Fans notices out to any number of subscribers.
///
/// Notices raised while nobody is subscribed are dropped. A lagging
/// subscriber loses the oldest toasts first.
#[derive(Debug, Clone)]
pub struct ToastChannel {
    tx: broadcast::Sender<Toast>,
}

impl ToastChannel {
    /// Creates a channel that buffers up to `capacity` toasts per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        ToastChannel { tx }
    }

    /// Subscribes to future toasts.
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.tx.subscribe()
    }
}

impl Default for ToastChannel {
    fn default() -> Self {
        Self::new(16)
    }
}

impl Notifier for ToastChannel {
    fn notify(&self, operation: Operation, notice: Notice) {
        if self.tx.send(Toast { operation, notice }).is_err() {
            debug!(operation = %operation, "Toast dropped, no subscribers");
        }
    }
}
