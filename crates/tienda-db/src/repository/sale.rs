//! # Sale Repository
//!
//! The sales ledger: one row per sale, each pointing at a client, a product
//! and a payment method.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. RECORD (SaleService::record_sale)                                  │
//! │     └── insert_in(tx, new_sale) → Sale { id: <uuid> }                  │
//! │     └── stock decremented in the same transaction                      │
//! │                                                                         │
//! │  2. (OPTIONAL) CORRECT                                                 │
//! │     └── update(sale) → full replace, stock untouched                   │
//! │                                                                         │
//! │  3. (OPTIONAL) DELETE                                                  │
//! │     └── delete(id) → row removed, stock untouched                      │
//! │                                                                         │
//! │  READ: by id, all, by date / range, by product / client / method,      │
//! │        joined details for reports, SQL-side daily totals              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tienda_core::analytics::DailyTotal;
use tienda_core::{Money, NewSale, Sale, SaleDetail, SaleLine};

const SALE_COLUMNS: &str = "s.id, s.sold_at, s.client_id, s.product_id, s.quantity, \
                            s.unit_price_cents, s.payment_method_id";

// =============================================================================
// Row Types
// =============================================================================

/// Flat row as stored; the total column is recomputed from quantity and price.
#[derive(Debug, FromRow)]
struct SaleRow {
    id: String,
    sold_at: DateTime<Utc>,
    client_id: String,
    product_id: String,
    quantity: i64,
    unit_price_cents: i64,
    payment_method_id: i64,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Sale {
            id: row.id,
            sold_at: row.sold_at,
            client_id: row.client_id,
            product_id: row.product_id,
            line: SaleLine::new(row.quantity, Money::from_cents(row.unit_price_cents)),
            payment_method_id: row.payment_method_id,
        }
    }
}

#[derive(Debug, FromRow)]
struct SaleDetailRow {
    #[sqlx(flatten)]
    sale: SaleRow,
    product_name: String,
    category_name: String,
    payment_method_name: String,
}

impl From<SaleDetailRow> for SaleDetail {
    fn from(row: SaleDetailRow) -> Self {
        SaleDetail {
            sale: row.sale.into(),
            product_name: row.product_name,
            category_name: row.category_name,
            payment_method_name: row.payment_method_name,
        }
    }
}

#[derive(Debug, FromRow)]
struct DailyTotalRow {
    day: NaiveDate,
    total_cents: i64,
    sale_count: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Stores a sale and returns it with its new id.
    ///
    /// Does not touch stock; use `SaleService::record_sale` for that.
    pub async fn insert(&self, sale: &NewSale) -> DbResult<Sale> {
        let mut conn = self.pool.acquire().await?;
        insert_in(&mut conn, sale).await
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales s WHERE s.id = ?1");
        let row = sqlx::query_as::<_, SaleRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Sale::from))
    }

    /// The whole ledger, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales s ORDER BY s.sold_at DESC, s.id");
        self.fetch_sales(sqlx::query_as::<_, SaleRow>(&sql)).await
    }

    /// Sales dated within `[start, end]`, both days inclusive, oldest first.
    pub async fn list_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<Sale>> {
        debug!(%start, %end, "Listing sales by date range");

        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales s \
             WHERE date(s.sold_at) BETWEEN ?1 AND ?2 ORDER BY s.sold_at, s.id"
        );
        self.fetch_sales(sqlx::query_as::<_, SaleRow>(&sql).bind(start).bind(end))
            .await
    }

    pub async fn list_by_date(&self, day: NaiveDate) -> DbResult<Vec<Sale>> {
        self.list_by_date_range(day, day).await
    }

    pub async fn list_by_product(&self, product_id: &str) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales s WHERE s.product_id = ?1 ORDER BY s.sold_at DESC, s.id"
        );
        self.fetch_sales(sqlx::query_as::<_, SaleRow>(&sql).bind(product_id))
            .await
    }

    pub async fn list_by_client(&self, client_id: &str) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales s WHERE s.client_id = ?1 ORDER BY s.sold_at DESC, s.id"
        );
        self.fetch_sales(sqlx::query_as::<_, SaleRow>(&sql).bind(client_id))
            .await
    }

    pub async fn list_by_payment_method(&self, payment_method_id: i64) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales s \
             WHERE s.payment_method_id = ?1 ORDER BY s.sold_at DESC, s.id"
        );
        self.fetch_sales(sqlx::query_as::<_, SaleRow>(&sql).bind(payment_method_id))
            .await
    }

    /// Every sale joined with its product, category and payment method names.
    pub async fn list_details(&self) -> DbResult<Vec<SaleDetail>> {
        let sql = detail_query("");
        let rows = sqlx::query_as::<_, SaleDetailRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(SaleDetail::from).collect())
    }

    /// Joined details for sales dated within `[start, end]`.
    pub async fn list_details_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<SaleDetail>> {
        let sql = detail_query("WHERE date(s.sold_at) BETWEEN ?1 AND ?2");
        let rows = sqlx::query_as::<_, SaleDetailRow>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(SaleDetail::from).collect())
    }

    /// Per-day totals computed by SQLite, ascending by day.
    ///
    /// Same result as `tienda_core::analytics::daily_totals` over the same
    /// sales; days without sales are absent.
    pub async fn daily_totals(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<DailyTotal>> {
        let rows = sqlx::query_as::<_, DailyTotalRow>(
            r#"
            SELECT date(sold_at) AS day,
                   SUM(total_cents) AS total_cents,
                   COUNT(*) AS sale_count
            FROM sales
            WHERE date(sold_at) BETWEEN ?1 AND ?2
            GROUP BY date(sold_at)
            ORDER BY day
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DailyTotal {
                date: row.day,
                total: Money::from_cents(row.total_cents),
                count: u64::try_from(row.sale_count).unwrap_or(0),
            })
            .collect())
    }

    /// Full replace of a stored sale. Stock is not adjusted.
    pub async fn update(&self, sale: &Sale) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        update_in(&mut conn, sale).await
    }

    /// Removes a sale. Stock is not adjusted.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        info!(id = %id, "Sale deleted");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn fetch_sales<'q>(
        &self,
        query: sqlx::query::QueryAs<'q, sqlx::Sqlite, SaleRow, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> DbResult<Vec<Sale>> {
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Sale::from).collect())
    }
}

fn detail_query(filter: &str) -> String {
    format!(
        "SELECT {SALE_COLUMNS}, \
                p.name AS product_name, \
                c.name AS category_name, \
                pm.name AS payment_method_name \
         FROM sales s \
         JOIN products p ON p.id = s.product_id \
         JOIN categories c ON c.id = p.category_id \
         JOIN payment_methods pm ON pm.id = s.payment_method_id \
         {filter} \
         ORDER BY s.sold_at, s.id"
    )
}

// =============================================================================
// Connection-Level Operations
// =============================================================================

/// Inserts a sale on an existing connection (or transaction), assigning a
/// fresh UUID.
pub(crate) async fn insert_in(conn: &mut SqliteConnection, new: &NewSale) -> DbResult<Sale> {
    let sale = Sale::from_new(Uuid::new_v4().to_string(), new.clone());

    debug!(id = %sale.id, product_id = %sale.product_id, "Inserting sale");

    sqlx::query(
        r#"
        INSERT INTO sales (
            id, sold_at, client_id, product_id,
            quantity, unit_price_cents, total_cents, payment_method_id
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&sale.id)
    .bind(sale.sold_at)
    .bind(&sale.client_id)
    .bind(&sale.product_id)
    .bind(sale.quantity())
    .bind(sale.unit_price().cents())
    .bind(sale.total().cents())
    .bind(sale.payment_method_id)
    .execute(&mut *conn)
    .await?;

    Ok(sale)
}

/// Rewrites every column of a stored sale on an existing connection.
pub(crate) async fn update_in(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
    debug!(id = %sale.id, "Updating sale");

    let result = sqlx::query(
        r#"
        UPDATE sales SET
            sold_at = ?2,
            client_id = ?3,
            product_id = ?4,
            quantity = ?5,
            unit_price_cents = ?6,
            total_cents = ?7,
            payment_method_id = ?8
        WHERE id = ?1
        "#,
    )
    .bind(&sale.id)
    .bind(sale.sold_at)
    .bind(&sale.client_id)
    .bind(&sale.product_id)
    .bind(sale.quantity())
    .bind(sale.unit_price().cents())
    .bind(sale.total().cents())
    .bind(sale.payment_method_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Sale", &sale.id));
    }

    Ok(())
}
