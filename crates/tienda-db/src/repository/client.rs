//! # Client Repository
//!
//! Database operations for clients. Clients are soft-deleted so that their
//! past sales keep pointing at a real row.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use tienda_core::Client;

const CLIENT_COLUMNS: &str = "id, first_name, last_name, phone, email, age, zone_id, \
                              registered_at, is_active";

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1");
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    /// Every client, including deactivated ones, by last then first name.
    pub async fn list(&self) -> DbResult<Vec<Client>> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY last_name, first_name");
        let clients = sqlx::query_as::<_, Client>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(clients)
    }

    pub async fn list_active(&self) -> DbResult<Vec<Client>> {
        let sql = format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE is_active = 1 \
             ORDER BY last_name, first_name"
        );
        let clients = sqlx::query_as::<_, Client>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(clients)
    }

    /// Case-insensitive substring match on first or last name.
    pub async fn search_by_name(&self, query: &str) -> DbResult<Vec<Client>> {
        let query = query.trim();
        debug!(query = %query, "Searching clients");

        let pattern = format!("%{query}%");
        let sql = format!(
            "SELECT {CLIENT_COLUMNS} FROM clients \
             WHERE first_name LIKE ?1 OR last_name LIKE ?1 \
             ORDER BY last_name, first_name"
        );
        let clients = sqlx::query_as::<_, Client>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(clients)
    }

    pub async fn list_by_zone(&self, zone_id: &str) -> DbResult<Vec<Client>> {
        let sql = format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE zone_id = ?1 \
             ORDER BY last_name, first_name"
        );
        let clients = sqlx::query_as::<_, Client>(&sql)
            .bind(zone_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(clients)
    }

    /// Inserts a new client (id generated beforehand).
    pub async fn insert(&self, client: &Client) -> DbResult<Client> {
        debug!(id = %client.id, "Inserting client");

        sqlx::query(
            r#"
            INSERT INTO clients (
                id, first_name, last_name, phone, email, age, zone_id,
                registered_at, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&client.id)
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(client.age)
        .bind(&client.zone_id)
        .bind(client.registered_at)
        .bind(client.is_active)
        .execute(&self.pool)
        .await?;

        Ok(client.clone())
    }

    /// Replaces every field except `id` and `registered_at`.
    pub async fn update(&self, client: &Client) -> DbResult<()> {
        debug!(id = %client.id, "Updating client");

        let result = sqlx::query(
            r#"
            UPDATE clients SET
                first_name = ?2,
                last_name = ?3,
                phone = ?4,
                email = ?5,
                age = ?6,
                zone_id = ?7,
                is_active = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&client.id)
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(client.age)
        .bind(&client.zone_id)
        .bind(client.is_active)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", &client.id));
        }

        Ok(())
    }

    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE clients SET is_active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        info!(id = %id, "Client deactivated");
        Ok(())
    }

    /// Counts active clients.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
