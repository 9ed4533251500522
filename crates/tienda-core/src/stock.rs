//! # Stock Rule
//!
//! The single rule that keeps inventory honest: a sale never takes a
//! product's stock below zero, and inactive products are never sold.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  ensure_can_sell(product, qty)                            │
//! │                                                           │
//! │  qty <= 0 ─────────────────────► Validation(quantity)     │
//! │  !is_active ───────────────────► InsufficientStock        │
//! │  stock < qty ──────────────────► InsufficientStock        │
//! │  otherwise ────────────────────► Ok, new stock = s - qty  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! The database layer repeats the same guard in its conditional `UPDATE`,
//! so a concurrent sale that slips past this check still cannot oversell.

use crate::error::{CoreError, CoreResult};
use crate::types::Product;
use crate::validation::validate_quantity;

/// Checks whether `quantity` units of `product` may be sold right now.
pub fn ensure_can_sell(product: &Product, quantity: i64) -> CoreResult<()> {
    validate_quantity(quantity)?;

    if !product.is_active || product.stock < quantity {
        return Err(CoreError::InsufficientStock {
            product_id: product.id.clone(),
            available: product.stock,
            requested: quantity,
        });
    }

    Ok(())
}

/// Stock left after selling `quantity` units, or the reason the sale is refused.
pub fn remaining_after_sale(product: &Product, quantity: i64) -> CoreResult<i64> {
    ensure_can_sell(product, quantity)?;
    Ok(product.stock - quantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(stock: i64, is_active: bool) -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Yerba 1kg".to_string(),
            description: None,
            category_id: "cat-1".to_string(),
            price_cents: 3500,
            stock,
            is_active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_can_sell_exact_stock() {
        assert_eq!(remaining_after_sale(&product(10, true), 3).unwrap(), 7);
        assert_eq!(remaining_after_sale(&product(5, true), 5).unwrap(), 0);
    }

    #[test]
    fn test_oversell_rejected() {
        let err = ensure_can_sell(&product(5, true), 6).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 5);
                assert_eq!(requested, 6);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_inactive_product_rejected() {
        let err = ensure_can_sell(&product(100, false), 1).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { available: 100, .. }));
    }

    #[test]
    fn test_non_positive_quantity_is_validation_error() {
        let err = ensure_can_sell(&product(10, true), 0).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        let err = ensure_can_sell(&product(10, true), -2).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
