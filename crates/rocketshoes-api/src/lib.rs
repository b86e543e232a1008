//! # rocketshoes-api: Catalog Access
//!
//! The cart asks the remote catalog two questions per operation: how many
//! units of a product are in stock, and what the product looks like.
//!
//! ## Endpoints
//! ```text
//! GET /stock/{id}     → { "id": 1, "amount": 3 }
//! GET /products/{id}  → { "id": 1, "title": "...", "price": 179.9, "image": "..." }
//! GET /products       → [ ... ]            (fixture server only)
//! GET /health         → "OK"               (fixture server only)
//! ```
//!
//! Any non-2xx answer or transport error is a lookup failure.
//!
//! ## Modules
//!
//! - [`client`] - `HttpCatalog`, the reqwest-backed client
//! - [`fixture`] - `CatalogFixture`, a catalog loaded from a JSON document
//! - [`server`] - `FixtureServer`, serves a fixture over HTTP (axum)
//! - [`error`] - Catalog error types

pub mod client;
pub mod error;
pub mod fixture;
pub mod server;

use std::sync::Arc;

use async_trait::async_trait;

use rocketshoes_core::{Product, ProductId, Stock};

pub use client::HttpCatalog;
pub use error::{ApiError, ApiResult};
pub use fixture::CatalogFixture;
pub use server::{FixtureServer, FixtureServerHandle};

/// Read-only view of the remote catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetches the available stock for a product.
    async fn stock(&self, id: ProductId) -> ApiResult<Stock>;

    /// Fetches product details.
    async fn product(&self, id: ProductId) -> ApiResult<Product>;
}

#[async_trait]
impl<T: Catalog + ?Sized> Catalog for Arc<T> {
    async fn stock(&self, id: ProductId) -> ApiResult<Stock> {
        (**self).stock(id).await
    }

    async fn product(&self, id: ProductId) -> ApiResult<Product> {
        (**self).product(id).await
    }
}
