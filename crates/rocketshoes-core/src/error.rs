//! # Error Types
//!
//! Domain-specific error types for rocketshoes-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rocketshoes-core errors (this file)                                   │
//! │  ├── CartError        - Rejected cart transitions                      │
//! │  └── ValidationError  - Input / snapshot validation failures           │
//! │                                                                         │
//! │  rocketshoes-storage  └── StorageError  - Key-value slot failures      │
//! │  rocketshoes-api      └── ApiError      - Catalog lookup failures      │
//! │                                                                         │
//! │  rocketshoes-cart     └── StoreError    - Wraps all of the above and   │
//! │                                           maps each one to a Notice    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Cart Error
// =============================================================================

/// A cart transition that was rejected.
///
/// None of these are fatal. The store turns each one into a toast and keeps
/// the previous snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CartError {
    /// Requested quantity is above what the catalog has in stock.
    ///
    /// ## When This Occurs
    /// - Adding a product whose stock is 0
    /// - Adding a product already in the cart at its stock limit
    /// - Updating an amount above the available stock
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    OutOfStock {
        product_id: ProductId,
        available: u32,
        requested: u32,
    },

    /// Product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Amount must be at least 1.
    #[error("Amount must be at least 1")]
    InvalidAmount,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., a price that is not a finite number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., the same product id twice in a snapshot).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CoreResult<T> = Result<T, CartError>;
