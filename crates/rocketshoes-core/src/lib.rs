//! # rocketshoes-core: Pure Cart Logic
//!
//! This crate holds the storefront cart's business rules as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      RocketShoes Cart Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               rocketshoes-cart (Cart Store)                     │   │
//! │  │   lookup stock ──► commit transition ──► persist ──► publish    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rocketshoes-core (THIS CRATE) ★                 │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cart    │  │  header   │  │  notice   │  │   │
//! │  │   │  Product  │  │   Cart    │  │ CartBadge │  │  Notice   │  │   │
//! │  │   │   Stock   │  │ with_*()  │  │ cart_size │  │ Operation │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog types (Product, Stock, UpdateProductAmount)
//! - [`cart`] - The cart snapshot and its transitions
//! - [`header`] - Distinct item count for the header badge
//! - [`notice`] - User-visible toast kinds
//! - [`error`] - Domain error types
//! - [`validation`] - Input and snapshot validation
//!
//! ## Example Usage
//!
//! ```rust
//! use rocketshoes_core::{Cart, CartBadge, Product, Stock};
//!
//! let sneaker = Product {
//!     id: 1,
//!     title: "Tênis de Caminhada Leve Confortável".to_string(),
//!     price: 179.9,
//!     image: "https://example.com/sneaker.jpg".to_string(),
//!     amount: 0,
//! };
//! let stock = Stock { id: 1, amount: 5 };
//!
//! let cart = Cart::new().with_added(&sneaker, &stock).unwrap();
//! let cart = cart.with_added(&sneaker, &stock).unwrap();
//!
//! assert_eq!(cart.get(1).map(|p| p.amount), Some(2));
//! assert_eq!(CartBadge::from(&cart).label(), "1 item");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod header;
pub mod notice;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use error::{CartError, CoreResult, ValidationError};
pub use header::{cart_size, CartBadge};
pub use notice::{Notice, Operation};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key holding the serialized cart snapshot.
///
/// The same key the storefront has always written to, so carts saved by
/// earlier sessions are picked up unchanged.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Base URL of the catalog service used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3333";
