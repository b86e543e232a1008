//! # Header Display
//!
//! Read-only view of the store for the page header. It never mutates the
//! cart; it derives a [`CartBadge`] from whatever was last committed.

use tokio::sync::watch;
use tracing::debug;

use rocketshoes_core::{Cart, CartBadge};

/// Live cart badge bound to a [`CartStore`](crate::CartStore).
#[derive(Debug, Clone)]
pub struct HeaderDisplay {
    rx: watch::Receiver<Cart>,
}

impl HeaderDisplay {
    pub(crate) fn new(rx: watch::Receiver<Cart>) -> Self {
        HeaderDisplay { rx }
    }

    /// Badge for the current cart.
    pub fn badge(&self) -> CartBadge {
        CartBadge::from(&*self.rx.borrow())
    }

    /// Distinct products in the cart.
    pub fn cart_size(&self) -> u32 {
        self.badge().size
    }

    /// Waits for the next commit and returns the new badge.
    ///
    /// Returns `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<CartBadge> {
        if self.rx.changed().await.is_err() {
            debug!("Cart store dropped, header detached");
            return None;
        }
        Some(CartBadge::from(&*self.rx.borrow_and_update()))
    }
}
