//! # rocketshoes-cart: Cart Store for RocketShoes
//!
//! The session cart: a store that mutates it through catalog-checked
//! operations, persists every committed snapshot and feeds the header badge.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Cart Architecture                              │
//! │                                                                         │
//! │   UI / CLI                                                              │
//! │     │ add_product(id)  remove_product(id)  update_product_amount(..)    │
//! │     ▼                                                                   │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         CartStore                                 │  │
//! │  │                                                                  │  │
//! │  │  Catalog (stock, product) ──► Cart transition ──► KeyValueStore  │  │
//! │  │                                      │                           │  │
//! │  │                                      ▼                           │  │
//! │  │                              watch::Sender<Cart>                 │  │
//! │  └───────────────┬──────────────────────┬───────────────────────────┘  │
//! │                  │ failures             │ commits                       │
//! │                  ▼                      ▼                               │
//! │           ┌─────────────┐        ┌──────────────┐                      │
//! │           │  Notifier   │        │HeaderDisplay │                      │
//! │           │  (toasts)   │        │ "2 items"    │                      │
//! │           └─────────────┘        └──────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`store`] - `CartStore` and its builder
//! - [`header`] - `HeaderDisplay`, the live cart badge
//! - [`notify`] - `Notifier` trait and the toast channel
//! - [`config`] - `CartConfig` (TOML file + environment)
//! - [`error`] - Store error types and their notices

pub mod config;
pub mod error;
pub mod header;
pub mod notify;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ApiSettings, CartConfig, CatalogSource, StorageSettings};
pub use error::{StoreError, StoreResult};
pub use header::HeaderDisplay;
pub use notify::{NoOpNotifier, Notifier, Toast, ToastChannel};
pub use store::{CartStore, CartStoreBuilder};
