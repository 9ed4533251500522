//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD operations
//! - Name / category lookups
//! - Stock: absolute set (restock) and guarded decrement (sales)
//!
//! ## Guarded Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Why the WHERE clause matters                         │
//! │                                                                         │
//! │  ❌ Read-then-write:                                                    │
//! │     SELECT stock → 5                                                   │
//! │     (another sale also reads 5)                                         │
//! │     UPDATE products SET stock = 5 - 4       → both succeed, stock -3   │
//! │                                                                         │
//! │  ✅ Conditional update:                                                 │
//! │     UPDATE products SET stock = stock - 4                              │
//! │      WHERE id = ? AND is_active = 1 AND stock >= 4                     │
//! │     rows_affected = 0 → someone got there first, refuse the sale       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use tienda_core::Product;

const PRODUCT_COLUMNS: &str =
    "id, name, description, category_id, price_cents, stock, is_active, created_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.get_by_id("uuid-here").await?;
/// let running_low = repo.low_stock(5).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by ID, active or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        get_by_id_in(&mut conn, id).await
    }

    /// Every product, by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Active products, by name.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1 ORDER BY name");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Substring match on the product name. An empty query lists active
    /// products.
    pub async fn search_by_name(&self, query: &str) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, "Searching products");

        if query.is_empty() {
            return self.list_active().await;
        }

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active = 1 AND name LIKE ?1 ORDER BY name"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(format!("%{query}%"))
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    pub async fn list_by_category(&self, category_id: &str) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE category_id = ?1 AND is_active = 1 ORDER BY name"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Active products with `stock <= threshold`, emptiest first.
    pub async fn low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        debug!(threshold, "Listing low-stock products");

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active = 1 AND stock <= ?1 ORDER BY stock, name"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(threshold)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Arguments
    /// * `product` - Product to insert (id should be generated beforehand)
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, category_id,
                price_cents, stock, is_active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category_id)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.is_active)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Replaces every field except `id` and `created_at`.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                category_id = ?4,
                price_cents = ?5,
                stock = ?6,
                is_active = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category_id)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.is_active)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Sets the stock to an absolute value (restocking, stock counts).
    ///
    /// A negative value is refused by the table's CHECK constraint.
    pub async fn set_stock(&self, id: &str, stock: i64) -> DbResult<()> {
        debug!(id = %id, stock, "Setting stock");

        let result = sqlx::query("UPDATE products SET stock = ?2 WHERE id = ?1")
            .bind(id)
            .bind(stock)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(id = %id, stock, "Stock set");
        Ok(())
    }

    /// Takes `quantity` units out of stock if the product is active and has
    /// enough. Returns `false`, changing nothing, otherwise.
    pub async fn try_decrement_stock(&self, id: &str, quantity: i64) -> DbResult<bool> {
        let mut conn = self.pool.acquire().await?;
        try_decrement_stock_in(&mut conn, id, quantity).await
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// Historical sales still reference the row.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let result = sqlx::query("UPDATE products SET is_active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Connection-Level Operations
// =============================================================================
// Used by the sale workflow inside its transaction.

pub(crate) async fn get_by_id_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(product)
}

pub(crate) async fn try_decrement_stock_in(
    conn: &mut SqliteConnection,
    id: &str,
    quantity: i64,
) -> DbResult<bool> {
    debug!(id = %id, quantity, "Decrementing stock");

    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - ?2
        WHERE id = ?1 AND is_active = 1 AND stock >= ?2
        "#,
    )
    .bind(id)
    .bind(quantity)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}
