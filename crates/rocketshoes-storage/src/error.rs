//! # Storage Error Types
//!
//! Error types for the key-value slot.
//!
//! ## Error Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error                          StorageError                      │
//! │  ───────────                          ────────────                      │
//! │  Database(..)          ────────────►  QueryFailed                       │
//! │  PoolTimedOut          ────────────►  PoolExhausted                     │
//! │  PoolClosed            ────────────►  ConnectionFailed                  │
//! │  Io / Configuration    ────────────►  ConnectionFailed                  │
//! │  anything else         ────────────►  Internal                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Key-value storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Opening the backing database failed.
    ///
    /// ## When This Occurs
    /// - Data directory cannot be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Creating the key-value table failed.
    #[error("Schema setup failed: {0}")]
    SchemaFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal storage error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StorageError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => StorageError::PoolExhausted,
            sqlx::Error::PoolClosed => StorageError::ConnectionFailed("Pool is closed".to_string()),
            sqlx::Error::Io(io) => StorageError::ConnectionFailed(io.to_string()),
            sqlx::Error::Configuration(cfg) => StorageError::ConnectionFailed(cfg.to_string()),
            other => StorageError::Internal(other.to_string()),
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
