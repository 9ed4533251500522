//! Errors reported by the sale workflow.
//!
//! ```text
//! ValidationError ──┐
//! CoreError ────────┼──► ServiceError ──► caller
//! DbError ──────────┘        │
//!   NotFound      → NotFound │
//!   anything else → Store (source kept)
//! ```

use thiserror::Error;

use crate::error::DbError;
use tienda_core::{CoreError, ValidationError};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected before any write was attempted.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced client, product, payment method or sale does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The product is inactive or has fewer units than requested.
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// The database failed underneath the workflow.
    #[error("Store error: {0}")]
    Store(#[source] DbError),
}

impl ServiceError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => ServiceError::InsufficientStock {
                product_id,
                available,
                requested,
            },
            CoreError::Validation(e) => ServiceError::Validation(e),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            other => ServiceError::Store(other),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        DbError::from(err).into()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_core_errors_keep_their_kind() {
        let err: ServiceError = CoreError::InsufficientStock {
            product_id: "p-1".to_string(),
            available: 5,
            requested: 6,
        }
        .into();
        assert!(matches!(
            err,
            ServiceError::InsufficientStock { available: 5, requested: 6, .. }
        ));

        let err: ServiceError = CoreError::not_found("Product", "p-2").into();
        assert_eq!(err.to_string(), "Product not found: p-2");
    }

    #[test]
    fn test_store_error_keeps_source() {
        let err: ServiceError = DbError::QueryFailed("disk I/O error".to_string()).into();
        assert!(matches!(err, ServiceError::Store(_)));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Query failed: disk I/O error"));
    }

    #[test]
    fn test_db_not_found_becomes_not_found() {
        let err: ServiceError = DbError::not_found("Sale", "s-1").into();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
