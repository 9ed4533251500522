//! # Database Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / MigrateError                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← constraint kind, table, column                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError ← NotFound stays NotFound, the rest becomes Store        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  anyhow::Error (CLI) ← printed with its cause chain                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The schema enforces the ledger's invariants with CHECK constraints
//! (`stock >= 0`, `quantity > 0`, `total_cents = quantity * unit_price_cents`),
//! so a write that slips past validation surfaces as
//! [`DbError::CheckViolation`] rather than corrupting the store.

use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// A lookup that must succeed found no row.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE or PRIMARY KEY index rejected the write.
    ///
    /// `field` is `table.column` as reported by SQLite.
    #[error("Duplicate {field}")]
    UniqueViolation { field: String },

    /// A row references a missing parent, or a referenced parent was deleted.
    ///
    /// - A sale for a client, product or payment method that doesn't exist
    /// - Deleting a zone or category that still has clients or products
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A CHECK or NOT NULL constraint rejected the row.
    ///
    /// - Negative stock
    /// - Non-positive quantity or price
    /// - A sale total that isn't quantity × unit price
    #[error("Constraint violation: {message}")]
    CheckViolation { message: String },

    /// The database file could not be opened, or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQL the database refused for any other reason.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Timed out waiting for a pooled connection.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Row decoding and anything else sqlx reports.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }

    /// True for constraint failures caused by the data being written, as
    /// opposed to an unhealthy store.
    pub fn is_constraint(&self) -> bool {
        matches!(
            self,
            DbError::UniqueViolation { .. }
                | DbError::ForeignKeyViolation { .. }
                | DbError::CheckViolation { .. }
        )
    }
}

/// SQLite reports `UNIQUE constraint failed: sales.id`; keep the `table.column`.
fn constraint_target(message: &str) -> String {
    message
        .rsplit_once(": ")
        .map(|(_, target)| target.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// ```text
/// RowNotFound                    → NotFound
/// Database, UniqueViolation      → UniqueViolation { table.column }
/// Database, ForeignKeyViolation  → ForeignKeyViolation
/// Database, Check / NotNull      → CheckViolation
/// Database, other                → QueryFailed
/// PoolTimedOut                   → PoolExhausted
/// PoolClosed, Io                 → ConnectionFailed
/// anything else                  → Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation {
                        field: constraint_target(&message),
                    },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
                    ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                        DbError::CheckViolation { message }
                    }
                    _ => DbError::QueryFailed(message),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            sqlx::Error::Io(io) => DbError::ConnectionFailed(io.to_string()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(err.is_not_found());
        assert!(!err.is_constraint());
    }

    #[test]
    fn test_pool_errors() {
        let err: DbError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DbError::PoolExhausted));

        let err: DbError = sqlx::Error::PoolClosed.into();
        assert_eq!(err.to_string(), "Connection failed: Pool is closed");
    }

    #[test]
    fn test_constraint_target() {
        assert_eq!(
            constraint_target("UNIQUE constraint failed: categories.name"),
            "categories.name"
        );
        assert_eq!(constraint_target("no colon here"), "unknown");
    }

    #[test]
    fn test_messages() {
        assert_eq!(DbError::not_found("Sale", "abc").to_string(), "Sale not found: abc");
        let err = DbError::CheckViolation {
            message: "CHECK constraint failed: stock >= 0".to_string(),
        };
        assert!(err.is_constraint());
        assert_eq!(err.to_string(), "Constraint violation: CHECK constraint failed: stock >= 0");
    }
}
