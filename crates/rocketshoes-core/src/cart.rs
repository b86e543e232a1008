//! # Cart
//!
//! The cart snapshot and the pure transitions between snapshots.
//!
//! ## Snapshot Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Transitions                                     │
//! │                                                                         │
//! │  Store Operation          Transition              Result                │
//! │  ───────────────          ──────────              ──────                │
//! │                                                                         │
//! │  add_product ────────────► with_added() ────────► S' (push or +1)      │
//! │                                                                         │
//! │  update_product_amount ──► with_amount() ───────► S' (items[i] = n)    │
//! │                                                                         │
//! │  remove_product ─────────► without() ───────────► S' (retain != id)    │
//! │                                                                         │
//! │  Every transition borrows S and returns a new S' or an error.          │
//! │  S is never modified, so a rejected transition leaves nothing behind.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CartError, CoreResult};
use crate::types::{Product, ProductId, Stock};
use crate::validation::validate_snapshot;

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `id` (adding the same product increases its amount)
/// - Every amount is >= 1
/// - Items keep insertion order
///
/// Serializes as a bare JSON array of products, which is the stored snapshot
/// format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from existing items, checking the invariants.
    pub fn from_items(items: Vec<Product>) -> CoreResult<Self> {
        validate_snapshot(&items)?;
        Ok(Cart { items })
    }

    /// Decodes a stored snapshot.
    ///
    /// Returns `Ok(None)` when the JSON does not describe a product list and
    /// `Err` when it does but breaks an invariant.
    pub fn from_snapshot(json: &str) -> CoreResult<Option<Self>> {
        match serde_json::from_str::<Vec<Product>>(json) {
            Ok(items) => Cart::from_items(items).map(Some),
            Err(_) => Ok(None),
        }
    }

    /// Encodes the cart as a snapshot string.
    pub fn to_snapshot(&self) -> String {
        // A Vec of plain structs with String/number fields cannot fail to encode.
        serde_json::to_string(&self.items).unwrap_or_else(|_| "[]".to_string())
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Looks up a cart entry by product id.
    pub fn get(&self, product_id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == product_id)
    }

    /// Checks if the product is in the cart.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Number of entries (one per distinct product).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all amounts.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|p| u64::from(p.amount)).sum()
    }

    /// Sum of all line subtotals, for display only.
    pub fn total_price(&self) -> f64 {
        self.items.iter().map(Product::subtotal).sum()
    }

    /// Adds one unit of `product`.
    ///
    /// ## Behavior
    /// - Stock is 0: `OutOfStock`
    /// - Already in cart: amount + 1, checked against `stock`
    /// - Not in cart: appended with amount 1
    pub fn with_added(&self, product: &Product, stock: &Stock) -> CoreResult<Self> {
        let requested = self.get(product.id).map_or(1, |p| p.amount.saturating_add(1));

        if stock.is_empty() || !stock.covers(requested) {
            return Err(CartError::OutOfStock {
                product_id: product.id,
                available: stock.amount,
                requested,
            });
        }

        let mut items = self.items.clone();
        match items.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => existing.amount = requested,
            None => items.push(product.with_amount(1)),
        }

        Ok(Cart { items })
    }

    /// Sets the amount of a product already in the cart.
    ///
    /// ## Behavior
    /// - Amount 0: `InvalidAmount` (callers filter these out first)
    /// - Amount above stock: `OutOfStock`
    /// - Product not found: `NotInCart`
    pub fn with_amount(&self, product_id: ProductId, amount: u32, stock: &Stock) -> CoreResult<Self> {
        if amount == 0 {
            return Err(CartError::InvalidAmount);
        }

        if !stock.covers(amount) {
            return Err(CartError::OutOfStock {
                product_id,
                available: stock.amount,
                requested: amount,
            });
        }

        let mut items = self.items.clone();
        let entry = items
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        entry.amount = amount;

        Ok(Cart { items })
    }

    /// Removes a product from the cart.
    pub fn without(&self, product_id: ProductId) -> CoreResult<Self> {
        if !self.contains(product_id) {
            return Err(CartError::NotInCart(product_id));
        }

        let items = self
            .items
            .iter()
            .filter(|p| p.id != product_id)
            .cloned()
            .collect();

        Ok(Cart { items })
    }
}
