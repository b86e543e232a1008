//! # rocketshoes-storage: Durable Key-Value Slot
//!
//! The cart is persisted the way a browser storefront persists it: as one
//! string value under one well-known key, fully replaced on every write.
//! This crate provides that slot.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Persistence                                │
//! │                                                                         │
//! │  Cart Store (rocketshoes-cart)                                         │
//! │       │  set("@RocketShoes:cart", "[{...}, {...}]")                    │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                rocketshoes-storage (THIS CRATE)                 │   │
//! │  │                                                                 │   │
//! │  │   trait KeyValueStore                                          │   │
//! │  │        ├── SqliteStorage  (kv_store table, WAL, on disk)       │   │
//! │  │        └── MemoryStorage  (HashMap, tests)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rocketshoes_storage::{KeyValueStore, SqliteStorage, StorageConfig};
//!
//! let storage = SqliteStorage::open(StorageConfig::new("./cart.db")).await?;
//! storage.set("@RocketShoes:cart", "[]").await?;
//! assert_eq!(storage.get("@RocketShoes:cart").await?.as_deref(), Some("[]"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod pool;
pub mod schema;

use async_trait::async_trait;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStorage;
pub use pool::{SqliteStorage, StorageConfig};

// =============================================================================
// Key-Value Store Trait
// =============================================================================

/// A durable string slot keyed by name.
///
/// Writes replace the whole value. There is no partial update.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}
