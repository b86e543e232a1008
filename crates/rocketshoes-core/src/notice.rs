//! # Notices
//!
//! The transient, non-blocking messages (toasts) shown when a cart
//! operation is rejected or fails.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Failure                          Operation        Notice               │
//! │  ───────                          ─────────        ──────               │
//! │  OutOfStock                       any              OutOfStock           │
//! │  lookup / storage / not in cart   Add              AddFailed            │
//! │                                   Remove           RemoveFailed         │
//! │                                   UpdateAmount     UpdateFailed         │
//! │  amount <= 0                      UpdateAmount     (none, silent)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Cart operation a notice originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Remove,
    UpdateAmount,
}

impl Operation {
    /// The generic failure notice for this operation.
    pub fn failure_notice(self) -> Notice {
        match self {
            Operation::Add => Notice::AddFailed,
            Operation::Remove => Notice::RemoveFailed,
            Operation::UpdateAmount => Notice::UpdateFailed,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Add => write!(f, "add_product"),
            Operation::Remove => write!(f, "remove_product"),
            Operation::UpdateAmount => write!(f, "update_product_amount"),
        }
    }
}

/// A user-visible toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// Requested quantity is not available.
    OutOfStock,
    /// Adding the product failed.
    AddFailed,
    /// The product to remove is not in the cart.
    RemoveFailed,
    /// Changing the product quantity failed.
    UpdateFailed,
}

impl Notice {
    /// Message shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Notice::OutOfStock => "Requested quantity is out of stock",
            Notice::AddFailed => "Error adding product",
            Notice::RemoveFailed => "Error removing product",
            Notice::UpdateFailed => "Error changing product quantity",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_notice_per_operation() {
        assert_eq!(Operation::Add.failure_notice(), Notice::AddFailed);
        assert_eq!(Operation::Remove.failure_notice(), Notice::RemoveFailed);
        assert_eq!(Operation::UpdateAmount.failure_notice(), Notice::UpdateFailed);
    }

    #[test]
    fn test_notice_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Notice::OutOfStock).unwrap(), "\"out_of_stock\"");
        assert_eq!(Notice::RemoveFailed.to_string(), "Error removing product");
    }
}
