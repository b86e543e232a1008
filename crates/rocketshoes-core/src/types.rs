//! # Domain Types
//!
//! Catalog types shared by the cart, the catalog client and the frontend.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Product      │   │     Stock       │   │ UpdateProductAmount │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id             │   │  id             │   │  productId          │   │
//! │  │  title          │   │  amount (remote │   │  amount (signed,    │   │
//! │  │  price          │   │   availability) │   │   may be <= 0)      │   │
//! │  │  image (url)    │   └─────────────────┘   └─────────────────────┘   │
//! │  │  amount (in cart)                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `GET /products/{id}` returns a Product without `amount`. It decodes to 0
//! and the cart sets it when the product is added.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Catalog identifier of a product.
pub type ProductId = u32;

// =============================================================================
// Product
// =============================================================================

/// A product as listed by the catalog and as held in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,

    /// Display title.
    pub title: String,

    /// Unit price as published by the catalog.
    pub price: f64,

    /// Image URL.
    pub image: String,

    /// Quantity held in the cart (0 for catalog listings).
    #[serde(default)]
    pub amount: u32,
}

impl Product {
    /// Returns a copy of this product holding `amount` units.
    pub fn with_amount(&self, amount: u32) -> Self {
        Product {
            amount,
            ..self.clone()
        }
    }

    /// Line subtotal (unit price × amount), for display only.
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.amount)
    }
}

// =============================================================================
// Stock
// =============================================================================

/// Remote-authoritative available quantity for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

impl Stock {
    /// Checks whether `requested` units can be held in the cart.
    #[inline]
    pub fn covers(&self, requested: u32) -> bool {
        requested <= self.amount
    }

    /// Checks if nothing is left in stock.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.amount == 0
    }
}

// =============================================================================
// Update Request
// =============================================================================

/// Request to set the amount of a product already in the cart.
///
/// `amount` is signed on purpose: a quantity stepper can ask for 0 or less,
/// and that request is ignored rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    #[ts(type = "number")]
    pub amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_decodes_without_amount() {
        let json = r#"{
            "id": 2,
            "title": "Tênis VR Caminhada Confortável Detalhes Couro Masculino",
            "price": 139.9,
            "image": "https://example.com/2.jpg"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, 2);
        assert_eq!(product.amount, 0);
    }

    #[test]
    fn test_update_request_uses_camel_case() {
        let req: UpdateProductAmount =
            serde_json::from_str(r#"{"productId": 4, "amount": -1}"#).unwrap();
        assert_eq!(req.product_id, 4);
        assert_eq!(req.amount, -1);
    }

    #[test]
    fn test_stock_covers() {
        let stock = Stock { id: 1, amount: 3 };
        assert!(stock.covers(3));
        assert!(!stock.covers(4));
        assert!(!stock.is_empty());
        assert!(Stock { id: 1, amount: 0 }.is_empty());
    }

    #[test]
    fn test_subtotal() {
        let product = Product {
            id: 1,
            title: "Sneaker".to_string(),
            price: 10.5,
            image: String::new(),
            amount: 2,
        };
        assert!((product.subtotal() - 21.0).abs() < f64::EPSILON);
    }
}
