//! # Validation Module
//!
//! Checks applied to input that crosses into the cart: requested amounts
//! from the UI, products from the catalog, and snapshots read back from
//! storage.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (UI / CLI)                                            │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── requested_amount: <= 0 is a silent no-op                          │
//! │  ├── validate_product: catalog payload sanity                          │
//! │  └── validate_snapshot: no duplicate ids, every amount >= 1            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart transitions (stock checks)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::Product;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Interprets a requested cart amount.
///
/// ## Returns
/// - `Ok(None)` for amounts <= 0 (the request is ignored)
/// - `Ok(Some(n))` for 1..=u32::MAX
/// - `Err` for amounts that do not fit
///
/// ## Example
/// ```rust
/// use rocketshoes_core::validation::requested_amount;
///
/// assert_eq!(requested_amount(0).unwrap(), None);
/// assert_eq!(requested_amount(-3).unwrap(), None);
/// assert_eq!(requested_amount(2).unwrap(), Some(2));
/// ```
pub fn requested_amount(amount: i64) -> ValidationResult<Option<u32>> {
    if amount <= 0 {
        return Ok(None);
    }

    u32::try_from(amount)
        .map(Some)
        .map_err(|_| ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 1,
            max: i64::from(u32::MAX),
        })
}

/// Validates a product received from the catalog.
///
/// ## Rules
/// - Title must not be empty
/// - Price must be a finite, non-negative number
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    if product.title.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if !product.price.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if product.price < 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a list of cart items (typically a stored snapshot).
///
/// ## Rules
/// - No product id appears twice
/// - Every amount is at least 1
pub fn validate_snapshot(items: &[Product]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        if !seen.insert(item.id) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: item.id.to_string(),
            });
        }

        if item.amount == 0 {
            return Err(ValidationError::MustBePositive {
                field: format!("amount of product {}", item.id),
            });
        }
    }

    Ok(())
}
