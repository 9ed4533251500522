//! # Stock-Guarded Sale Workflow
//!
//! Recording a sale means two writes: the sale row and the stock decrement.
//! Both happen in one transaction, and the decrement is conditional, so a
//! product can never be oversold even if two sales race for the last units.
//!
//! ## record_sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate_new_sale(sale)           ── fail → Validation   (no writes)  │
//! │       │                                                                 │
//! │  BEGIN                                                                 │
//! │       │                                                                 │
//! │  client exists?                    ── no   → NotFound                  │
//! │  payment method exists?            ── no   → NotFound                  │
//! │  product = SELECT ...              ── none → NotFound                  │
//! │  ensure_can_sell(product, qty)     ── fail → InsufficientStock         │
//! │       │                                                                 │
//! │  INSERT INTO sales ...             → new id                            │
//! │  UPDATE products SET stock = stock - qty                               │
//! │   WHERE id = ? AND is_active = 1 AND stock >= qty                      │
//! │       │                                                                 │
//! │       ├── 0 rows → InsufficientStock, transaction rolled back          │
//! │       ▼                                                                 │
//! │  COMMIT → Ok(id)                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use super::error::{ServiceError, ServiceResult};
use crate::repository::product::{self, ProductRepository};
use crate::repository::sale::{self as sale_repo, SaleRepository};
use tienda_core::stock::ensure_can_sell;
use tienda_core::validation::{validate_new_sale, validate_quantity, validate_stock};
use tienda_core::{NewSale, Product, Sale};

/// The stock-guarded sale workflow.
#[derive(Debug, Clone)]
pub struct SaleService {
    pool: SqlitePool,
}

impl SaleService {
    pub fn new(pool: SqlitePool) -> Self {
        SaleService { pool }
    }

    /// Records a sale and takes its units out of stock, atomically.
    ///
    /// Returns the new sale's id. On any error nothing is written.
    pub async fn record_sale(&self, sale: NewSale) -> ServiceResult<String> {
        validate_new_sale(&sale)?;

        debug!(
            product_id = %sale.product_id,
            client_id = %sale.client_id,
            quantity = sale.line.quantity(),
            "Recording sale"
        );

        let mut tx = self.pool.begin().await?;

        ensure_client_exists(&mut tx, &sale.client_id).await?;
        ensure_payment_method_exists(&mut tx, sale.payment_method_id).await?;

        let product = fetch_product(&mut tx, &sale.product_id).await?;
        if let Err(err) = ensure_can_sell(&product, sale.line.quantity()) {
            warn!(product_id = %product.id, stock = product.stock, "Sale refused: {err}");
            return Err(err.into());
        }

        let stored = sale_repo::insert_in(&mut tx, &sale).await?;
        decrement_or_refuse(&mut tx, &sale.product_id, sale.line.quantity()).await?;

        tx.commit().await?;

        info!(
            sale_id = %stored.id,
            product_id = %stored.product_id,
            quantity = stored.quantity(),
            total = %stored.total(),
            "Sale recorded"
        );

        Ok(stored.id)
    }

    /// Takes `quantity` units out of a product's stock and returns what is
    /// left.
    pub async fn reduce_stock(&self, product_id: &str, quantity: i64) -> ServiceResult<i64> {
        validate_quantity(quantity)?;

        let mut tx = self.pool.begin().await?;

        let product = fetch_product(&mut tx, product_id).await?;
        ensure_can_sell(&product, quantity)?;
        decrement_or_refuse(&mut tx, product_id, quantity).await?;

        tx.commit().await?;

        let remaining = product.stock - quantity;
        info!(product_id = %product_id, quantity, remaining, "Stock reduced");
        Ok(remaining)
    }

    /// Sets a product's stock to an absolute, non-negative value.
    pub async fn set_stock(&self, product_id: &str, stock: i64) -> ServiceResult<()> {
        validate_stock(stock)?;
        ProductRepository::new(self.pool.clone())
            .set_stock(product_id, stock)
            .await?;
        Ok(())
    }

    /// Full replace of a stored sale.
    ///
    /// Field rules and reference checks are the same as for a new sale.
    /// Stock is not adjusted.
    pub async fn update_sale(&self, sale: &Sale) -> ServiceResult<()> {
        let as_new = NewSale {
            sold_at: sale.sold_at,
            client_id: sale.client_id.clone(),
            product_id: sale.product_id.clone(),
            line: sale.line,
            payment_method_id: sale.payment_method_id,
        };
        validate_new_sale(&as_new)?;

        let mut tx = self.pool.begin().await?;

        ensure_client_exists(&mut tx, &sale.client_id).await?;
        ensure_payment_method_exists(&mut tx, sale.payment_method_id).await?;
        fetch_product(&mut tx, &sale.product_id).await?;
        sale_repo::update_in(&mut tx, sale).await?;

        tx.commit().await?;
        info!(sale_id = %sale.id, "Sale updated");
        Ok(())
    }

    /// Deletes a stored sale. Stock is not adjusted.
    pub async fn delete_sale(&self, id: &str) -> ServiceResult<()> {
        SaleRepository::new(self.pool.clone()).delete(id).await?;
        Ok(())
    }
}

// =============================================================================
// Transaction Steps
// =============================================================================

async fn ensure_client_exists(conn: &mut SqliteConnection, client_id: &str) -> ServiceResult<()> {
    let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE id = ?1")
        .bind(client_id)
        .fetch_one(&mut *conn)
        .await?;

    if found == 0 {
        return Err(ServiceError::not_found("Client", client_id));
    }
    Ok(())
}

async fn ensure_payment_method_exists(conn: &mut SqliteConnection, id: i64) -> ServiceResult<()> {
    let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payment_methods WHERE id = ?1")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    if found == 0 {
        return Err(ServiceError::not_found("PaymentMethod", id.to_string()));
    }
    Ok(())
}

async fn fetch_product(conn: &mut SqliteConnection, product_id: &str) -> ServiceResult<Product> {
    product::get_by_id_in(conn, product_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Product", product_id))
}

/// Runs the guarded decrement; if it matches no row, reports the stock as it
/// is now so the caller sees the real figure.
async fn decrement_or_refuse(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
) -> ServiceResult<()> {
    if product::try_decrement_stock_in(conn, product_id, quantity).await? {
        return Ok(());
    }

    let available = product::get_by_id_in(conn, product_id)
        .await?
        .map(|p| p.stock)
        .unwrap_or(0);

    warn!(product_id = %product_id, available, requested = quantity, "Stock changed under sale");

    Err(ServiceError::InsufficientStock {
        product_id: product_id.to_string(),
        available,
        requested: quantity,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures;
    use chrono::Utc;
    use tienda_core::{Money, PaymentMethod};

    fn new_sale(shop: &fixtures::Shop, quantity: i64) -> NewSale {
        NewSale::new(
            Utc::now(),
            &shop.client.id,
            &shop.product.id,
            quantity,
            shop.product.price(),
            PaymentMethod::CASH,
        )
    }

    async fn stock_of(shop: &fixtures::Shop) -> i64 {
        shop.db
            .products()
            .get_by_id(&shop.product.id)
            .await
            .unwrap()
            .unwrap()
            .stock
    }

    #[tokio::test]
    async fn test_record_sale_decrements_stock() {
        let shop = fixtures::shop(10).await;

        let id = shop.db.sale_service().record_sale(new_sale(&shop, 3)).await.unwrap();

        assert_eq!(stock_of(&shop).await, 7);
        let stored = shop.db.sales().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.quantity(), 3);
        assert_eq!(stored.total().cents(), 3750);
    }

    #[tokio::test]
    async fn test_oversell_is_refused_without_writes() {
        let shop = fixtures::shop(5).await;

        let err = shop
            .db
            .sale_service()
            .record_sale(new_sale(&shop, 6))
            .await
            .unwrap_err();

        match err {
            ServiceError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 5);
                assert_eq!(requested, 6);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(stock_of(&shop).await, 5);
        assert_eq!(shop.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_selling_the_last_units() {
        let shop = fixtures::shop(5).await;
        let service = shop.db.sale_service();

        service.record_sale(new_sale(&shop, 5)).await.unwrap();
        assert_eq!(stock_of(&shop).await, 0);

        let err = service.record_sale(new_sale(&shop, 1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InsufficientStock { available: 0, .. }));
    }

    #[tokio::test]
    async fn test_inactive_product_cannot_be_sold() {
        let shop = fixtures::shop(10).await;
        shop.db.products().soft_delete(&shop.product.id).await.unwrap();

        let err = shop
            .db
            .sale_service()
            .record_sale(new_sale(&shop, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InsufficientStock { available: 10, .. }));
        assert_eq!(stock_of(&shop).await, 10);
    }

    #[tokio::test]
    async fn test_validation_failures_name_the_field() {
        let shop = fixtures::shop(10).await;
        let service = shop.db.sale_service();

        let err = service.record_sale(new_sale(&shop, 0)).await.unwrap_err();
        match err {
            ServiceError::Validation(e) => assert_eq!(e.field(), "quantity"),
            other => panic!("unexpected error: {other:?}"),
        }

        let mut sale = new_sale(&shop, 1);
        sale.line.set_unit_price(Money::zero());
        let err = service.record_sale(sale).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.field() == "unit_price"));

        let mut sale = new_sale(&shop, 1);
        sale.payment_method_id = 0;
        let err = service.record_sale(sale).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.field() == "payment_method_id"));

        assert_eq!(stock_of(&shop).await, 10);
    }

    #[tokio::test]
    async fn test_missing_references_are_not_found() {
        let shop = fixtures::shop(10).await;
        let service = shop.db.sale_service();

        let mut sale = new_sale(&shop, 1);
        sale.product_id = "no-such-product".to_string();
        let err = service.record_sale(sale).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { ref entity, .. } if entity == "Product"));

        let mut sale = new_sale(&shop, 1);
        sale.client_id = "no-such-client".to_string();
        let err = service.record_sale(sale).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { ref entity, .. } if entity == "Client"));

        let mut sale = new_sale(&shop, 1);
        sale.payment_method_id = 42;
        let err = service.record_sale(sale).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { ref entity, .. } if entity == "PaymentMethod"));

        assert_eq!(shop.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reduce_stock() {
        let shop = fixtures::shop(10).await;
        let service = shop.db.sale_service();

        let err = service.reduce_stock(&shop.product.id, 0).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(stock_of(&shop).await, 10);

        assert_eq!(service.reduce_stock(&shop.product.id, 4).await.unwrap(), 6);
        assert_eq!(stock_of(&shop).await, 6);

        let err = service.reduce_stock(&shop.product.id, 7).await.unwrap_err();
        assert!(matches!(err, ServiceError::InsufficientStock { available: 6, requested: 7, .. }));

        let err = service.reduce_stock("missing", 1).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_set_stock_rejects_negative() {
        let shop = fixtures::shop(10).await;
        let service = shop.db.sale_service();

        let err = service.set_stock(&shop.product.id, -3).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        service.set_stock(&shop.product.id, 40).await.unwrap();
        assert_eq!(stock_of(&shop).await, 40);

        let err = service.set_stock("missing", 1).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_and_delete_leave_stock_alone() {
        let shop = fixtures::shop(10).await;
        let service = shop.db.sale_service();
        let id = service.record_sale(new_sale(&shop, 2)).await.unwrap();

        let mut sale = shop.db.sales().get_by_id(&id).await.unwrap().unwrap();
        sale.set_quantity(5);
        service.update_sale(&sale).await.unwrap();
        assert_eq!(stock_of(&shop).await, 8);

        sale.set_quantity(0);
        let err = service.update_sale(&sale).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        service.delete_sale(&id).await.unwrap();
        assert_eq!(stock_of(&shop).await, 8);
        let err = service.delete_sale(&id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_with_missing_references_is_not_found() {
        let shop = fixtures::shop(10).await;
        let service = shop.db.sale_service();
        let id = service.record_sale(new_sale(&shop, 2)).await.unwrap();
        let stored = shop.db.sales().get_by_id(&id).await.unwrap().unwrap();

        let mut sale = stored.clone();
        sale.client_id = "no-such-client".to_string();
        let err = service.update_sale(&sale).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { ref entity, .. } if entity == "Client"));

        let mut sale = stored.clone();
        sale.product_id = "no-such-product".to_string();
        let err = service.update_sale(&sale).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { ref entity, .. } if entity == "Product"));

        let mut sale = stored.clone();
        sale.payment_method_id = 42;
        let err = service.update_sale(&sale).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { ref entity, .. } if entity == "PaymentMethod"));

        let mut sale = stored.clone();
        sale.id = "no-such-sale".to_string();
        let err = service.update_sale(&sale).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { ref entity, .. } if entity == "Sale"));

        let unchanged = shop.db.sales().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(unchanged, stored);
    }

    #[tokio::test]
    async fn test_overflowing_total_is_rejected_without_writes() {
        let shop = fixtures::shop(10).await;

        let mut sale = new_sale(&shop, 2);
        sale.line.set_unit_price(Money::from_cents(i64::MAX / 2 + 1));
        let err = shop.db.sale_service().record_sale(sale).await.unwrap_err();

        assert!(matches!(err, ServiceError::Validation(ref e) if e.field() == "total"));
        assert_eq!(stock_of(&shop).await, 10);
        assert_eq!(shop.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_lost_decrement_rolls_back_the_sale_row() {
        let shop = fixtures::shop(10).await;
        let mut tx = shop.db.pool().begin().await.unwrap();

        // Another writer took stock between the check and the decrement
        sqlx::query("UPDATE products SET stock = 1 WHERE id = ?1")
            .bind(&shop.product.id)
            .execute(&mut *tx)
            .await
            .unwrap();

        sale_repo::insert_in(&mut tx, &new_sale(&shop, 3)).await.unwrap();
        let err = decrement_or_refuse(&mut tx, &shop.product.id, 3)
            .await
            .unwrap_err();

        match err {
            ServiceError::InsufficientStock {
                ref product_id,
                available,
                requested,
            } => {
                assert_eq!(product_id, &shop.product.id);
                assert_eq!(available, 1);
                assert_eq!(requested, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        drop(tx);
        assert_eq!(shop.db.sales().count().await.unwrap(), 0);
        assert_eq!(stock_of(&shop).await, 10);
    }
}
