//! # Catalog Fixture
//!
//! A catalog held in memory, loaded from the same JSON document the
//! storefront's mock API serves during development:
//!
//! ```json
//! {
//!   "products": [ { "id": 1, "title": "...", "price": 179.9, "image": "..." } ],
//!   "stock":    [ { "id": 1, "amount": 3 } ]
//! }
//! ```
//!
//! It implements [`Catalog`] directly, which makes it the offline backend
//! for the CLI and the fake for store tests, and it is what
//! [`FixtureServer`](crate::FixtureServer) serves over HTTP.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use rocketshoes_core::validation::validate_product;
use rocketshoes_core::{Product, ProductId, Stock};

use crate::error::{ApiError, ApiResult};
use crate::Catalog;

/// In-memory catalog document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFixture {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub stock: Vec<Stock>,
}

impl CatalogFixture {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a fixture document.
    ///
    /// Every product must pass catalog validation.
    pub fn from_json(json: &str) -> ApiResult<Self> {
        let fixture: CatalogFixture =
            serde_json::from_str(json).map_err(|e| ApiError::FixtureLoadFailed(e.to_string()))?;

        for product in &fixture.products {
            validate_product(product)
                .map_err(|e| ApiError::FixtureLoadFailed(format!("product {}: {}", product.id, e)))?;
        }

        Ok(fixture)
    }

    /// Reads and parses a fixture file.
    pub fn from_file(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ApiError::FixtureLoadFailed(format!("{}: {}", path.display(), e)))?;

        let fixture = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            products = fixture.products.len(),
            "Catalog fixture loaded"
        );
        Ok(fixture)
    }

    /// Adds a product and its stock level.
    pub fn with_product(mut self, product: Product, stock: u32) -> Self {
        self.stock.retain(|s| s.id != product.id);
        self.products.retain(|p| p.id != product.id);
        self.stock.push(Stock {
            id: product.id,
            amount: stock,
        });
        self.products.push(product);
        self
    }

    /// Looks up a product.
    pub fn find_product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks up a stock entry.
    pub fn find_stock(&self, id: ProductId) -> Option<Stock> {
        self.stock.iter().copied().find(|s| s.id == id)
    }
}

#[async_trait]
impl Catalog for CatalogFixture {
    async fn stock(&self, id: ProductId) -> ApiResult<Stock> {
        debug!(product_id = id, "Fixture stock lookup");
        self.find_stock(id)
            .ok_or(ApiError::NotFound { resource: "stock", id })
    }

    async fn product(&self, id: ProductId) -> ApiResult<Product> {
        debug!(product_id = id, "Fixture product lookup");
        self.find_product(id)
            .cloned()
            .ok_or(ApiError::NotFound { resource: "product", id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "products": [
            {"id": 1, "title": "Tênis de Caminhada Leve Confortável", "price": 179.9, "image": "https://example.com/1.jpg"},
            {"id": 2, "title": "Tênis VR Caminhada Confortável", "price": 139.9, "image": "https://example.com/2.jpg"}
        ],
        "stock": [
            {"id": 1, "amount": 3},
            {"id": 2, "amount": 0}
        ]
    }"#;

    #[tokio::test]
    async fn test_lookup() {
        let fixture = CatalogFixture::from_json(FIXTURE).unwrap();

        assert_eq!(fixture.stock(1).await.unwrap().amount, 3);
        assert_eq!(fixture.product(2).await.unwrap().price, 139.9);
        assert!(fixture.stock(9).await.unwrap_err().is_not_found());
        assert!(fixture.product(9).await.unwrap_err().is_not_found());
    }

    #[test]
    fn test_invalid_fixture_is_rejected() {
        assert!(CatalogFixture::from_json("{").is_err());

        let untitled = r#"{"products": [{"id": 1, "title": "", "price": 1.0, "image": ""}]}"#;
        assert!(matches!(
            CatalogFixture::from_json(untitled),
            Err(ApiError::FixtureLoadFailed(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.json");
        std::fs::write(&path, FIXTURE).unwrap();

        let fixture = CatalogFixture::from_file(&path).unwrap();
        assert_eq!(fixture.products.len(), 2);
        assert!(CatalogFixture::from_file(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_bundled_fixture_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/server.json");
        let fixture = CatalogFixture::from_file(path).unwrap();

        for product in &fixture.products {
            assert!(fixture.find_stock(product.id).is_some(), "no stock for {}", product.id);
        }
    }

    #[test]
    fn test_with_product_replaces() {
        let product = Product {
            id: 1,
            title: "A".to_string(),
            price: 1.0,
            image: String::new(),
            amount: 0,
        };
        let fixture = CatalogFixture::new()
            .with_product(product.clone(), 1)
            .with_product(product, 4);

        assert_eq!(fixture.products.len(), 1);
        assert_eq!(fixture.find_stock(1).map(|s| s.amount), Some(4));
    }
}
