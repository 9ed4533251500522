//! # Reference Data Repositories
//!
//! Zones, categories and payment methods: small lookup tables the main
//! records point at.
//!
//! Payment methods are fixed by the initial migration and are read-only here.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use tienda_core::{Category, PaymentMethod, Zone};

// =============================================================================
// Zones
// =============================================================================

#[derive(Debug, Clone)]
pub struct ZoneRepository {
    pool: SqlitePool,
}

impl ZoneRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ZoneRepository { pool }
    }

    /// All zones, by province then city.
    pub async fn list(&self) -> DbResult<Vec<Zone>> {
        let zones = sqlx::query_as::<_, Zone>(
            "SELECT id, city, province FROM zones ORDER BY province, city",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(zones)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Zone>> {
        let zone = sqlx::query_as::<_, Zone>("SELECT id, city, province FROM zones WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(zone)
    }

    pub async fn insert(&self, zone: &Zone) -> DbResult<Zone> {
        debug!(city = %zone.city, "Inserting zone");

        sqlx::query("INSERT INTO zones (id, city, province) VALUES (?1, ?2, ?3)")
            .bind(&zone.id)
            .bind(&zone.city)
            .bind(&zone.province)
            .execute(&self.pool)
            .await?;

        Ok(zone.clone())
    }

    /// Deletes a zone. Fails with a foreign key violation while clients
    /// still live in it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM zones WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Zone", id));
        }

        info!(id = %id, "Zone deleted");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM zones")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn insert(&self, category: &Category) -> DbResult<Category> {
        debug!(name = %category.name, "Inserting category");

        sqlx::query("INSERT INTO categories (id, name, description) VALUES (?1, ?2, ?3)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.description)
            .execute(&self.pool)
            .await?;

        Ok(category.clone())
    }

    /// Deletes a category. Fails with a foreign key violation while products
    /// are still listed under it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        info!(id = %id, "Category deleted");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Payment Methods
// =============================================================================

#[derive(Debug, Clone)]
pub struct PaymentMethodRepository {
    pool: SqlitePool,
}

impl PaymentMethodRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PaymentMethodRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<PaymentMethod>> {
        let methods =
            sqlx::query_as::<_, PaymentMethod>("SELECT id, name FROM payment_methods ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(methods)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<PaymentMethod>> {
        let method = sqlx::query_as::<_, PaymentMethod>(
            "SELECT id, name FROM payment_methods WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_payment_methods_are_seeded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let methods = db.payment_methods().list().await.unwrap();
        let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Cash", "Debit card", "Credit card", "Bank transfer"]);

        let credit = db
            .payment_methods()
            .get_by_id(PaymentMethod::CREDIT_CARD)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(credit.name, "Credit card");
        assert!(db.payment_methods().get_by_id(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_zone_crud() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let zone = fixtures::zone(&db, "Rosario", "Santa Fe").await;

        let fetched = db.zones().get_by_id(&zone.id).await.unwrap().unwrap();
        assert_eq!(fetched, zone);
        assert_eq!(db.zones().count().await.unwrap(), 1);

        db.zones().delete(&zone.id).await.unwrap();
        assert!(db.zones().get_by_id(&zone.id).await.unwrap().is_none());

        let err = db.zones().delete(&zone.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_referenced_zone_cannot_be_deleted() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let zone = fixtures::zone(&db, "Córdoba", "Córdoba").await;
        fixtures::client(&db, &zone.id, "Lucía", "Gómez").await;

        let err = db.zones().delete(&zone.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_categories_listed_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        fixtures::category(&db, "Snacks").await;
        let hygiene = fixtures::category(&db, "Hygiene").await;

        let names: Vec<String> = db
            .categories()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Hygiene", "Snacks"]);

        db.categories().delete(&hygiene.id).await.unwrap();
        assert_eq!(db.categories().count().await.unwrap(), 1);
    }
}
