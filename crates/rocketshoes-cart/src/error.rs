//! # Store Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Store Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Rejection     │  │    Lookup       │  │     Storage             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  CartError      │  │  ApiError       │  │  StorageError           │ │
//! │  │  (out of stock, │  │  (network, 404, │  │  (snapshot write or     │ │
//! │  │   not in cart)  │  │   decode)       │  │   initial read)         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   Configuration: InvalidConfig, ConfigLoadFailed               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Every operation error maps to exactly one Notice via notice().        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use rocketshoes_api::ApiError;
use rocketshoes_core::{CartError, Notice, Operation};
use rocketshoes_storage::StorageError;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Cart store error type.
#[derive(Debug, Error)]
pub enum StoreError {
    // =========================================================================
    // Operation Errors
    // =========================================================================
    /// The cart rules rejected the transition.
    #[error(transparent)]
    Rejected(#[from] CartError),

    /// A catalog lookup failed.
    #[error("Catalog lookup failed: {0}")]
    Lookup(#[from] ApiError),

    /// Reading or writing the snapshot failed.
    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid cart configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),
}

impl StoreError {
    /// The toast shown when `operation` fails with this error.
    pub fn notice(&self, operation: Operation) -> Notice {
        match self {
            StoreError::Rejected(CartError::OutOfStock { .. }) => Notice::OutOfStock,
            _ => operation.failure_notice(),
        }
    }

    /// Returns true for expected business rejections.
    pub fn is_rejection(&self) -> bool {
        matches!(self, StoreError::Rejected(_))
    }

    /// Returns true when the remote catalog could not answer.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, StoreError::Lookup(_))
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<url::ParseError> for StoreError {
    fn from(err: url::ParseError) -> Self {
        StoreError::InvalidConfig(format!("Invalid API URL: {}", err))
    }
}
