//! # Header Badge
//!
//! The storefront header shows how many different products are in the cart,
//! not how many units.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  ROCKETSHOES                  My cart        │
//! │                               2 items   [🧺] │
//! └──────────────────────────────────────────────┘
//!   cart = [{id: 1, amount: 2}, {id: 2, amount: 1}]  →  size 2
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::types::Product;

/// Counts distinct product ids.
///
/// The cart already guarantees unique ids, but the count does not rely on it.
pub fn cart_size(items: &[Product]) -> usize {
    items.iter().map(|p| p.id).collect::<HashSet<_>>().len()
}

/// Derived header badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartBadge {
    pub size: u32,
}

impl CartBadge {
    /// Pluralized label: "1 item", otherwise "N items".
    pub fn label(&self) -> String {
        if self.size == 1 {
            format!("{} item", self.size)
        } else {
            format!("{} items", self.size)
        }
    }
}

impl From<&Cart> for CartBadge {
    fn from(cart: &Cart) -> Self {
        CartBadge {
            size: u32::try_from(cart_size(cart.items())).unwrap_or(u32::MAX),
        }
    }
}

impl fmt::Display for CartBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
