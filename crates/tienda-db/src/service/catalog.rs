//! # Catalog Writes
//!
//! Clients and products go through field validation before they reach the
//! repositories. A record that fails validation is never written.

use sqlx::SqlitePool;
use tracing::{debug, info};

use super::error::ServiceResult;
use crate::repository::client::ClientRepository;
use crate::repository::product::ProductRepository;
use tienda_core::validation::{validate_client, validate_product};
use tienda_core::{Client, Product};

#[derive(Debug, Clone)]
pub struct CatalogService {
    pool: SqlitePool,
}

impl CatalogService {
    pub fn new(pool: SqlitePool) -> Self {
        CatalogService { pool }
    }

    pub async fn add_client(&self, client: &Client) -> ServiceResult<Client> {
        validate_client(client)?;
        let stored = ClientRepository::new(self.pool.clone()).insert(client).await?;
        debug!(client_id = %stored.id, "Client added");
        Ok(stored)
    }

    pub async fn update_client(&self, client: &Client) -> ServiceResult<()> {
        validate_client(client)?;
        ClientRepository::new(self.pool.clone()).update(client).await?;
        info!(client_id = %client.id, "Client updated");
        Ok(())
    }

    pub async fn add_product(&self, product: &Product) -> ServiceResult<Product> {
        validate_product(product)?;
        let stored = ProductRepository::new(self.pool.clone()).insert(product).await?;
        debug!(product_id = %stored.id, "Product added");
        Ok(stored)
    }

    /// Replaces a product's catalog fields. Stock rules are the same as for
    /// [`SaleService::set_stock`](super::SaleService::set_stock).
    pub async fn update_product(&self, product: &Product) -> ServiceResult<()> {
        validate_product(product)?;
        ProductRepository::new(self.pool.clone()).update(product).await?;
        info!(product_id = %product.id, "Product updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{fixtures, new_id};
    use crate::service::ServiceError;

    #[tokio::test]
    async fn test_invalid_client_is_not_written() {
        let shop = fixtures::shop(10).await;
        let catalog = shop.db.catalog();

        let mut client = shop.client.clone();
        client.id = new_id();
        client.first_name = "R2D2".to_string();
        let err = catalog.add_client(&client).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.field() == "first_name"));

        client.first_name = "Lucía".to_string();
        client.email = Some("not-an-email".to_string());
        let err = catalog.add_client(&client).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.field() == "email"));
        assert_eq!(shop.db.clients().count().await.unwrap(), 1);

        let mut existing = shop.client.clone();
        existing.age = 130;
        let err = catalog.update_client(&existing).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.field() == "age"));
        let stored = shop.db.clients().get_by_id(&shop.client.id).await.unwrap().unwrap();
        assert_eq!(stored.age, shop.client.age);
    }

    #[tokio::test]
    async fn test_valid_client_round_trips() {
        let shop = fixtures::shop(10).await;
        let catalog = shop.db.catalog();

        let mut client = shop.client.clone();
        client.id = new_id();
        client.first_name = "Lucía".to_string();
        client.email = None;
        let stored = catalog.add_client(&client).await.unwrap();
        assert_eq!(stored.first_name, "Lucía");
        assert_eq!(shop.db.clients().count().await.unwrap(), 2);

        client.last_name = "Gómez".to_string();
        catalog.update_client(&client).await.unwrap();
        let stored = shop.db.clients().get_by_id(&client.id).await.unwrap().unwrap();
        assert_eq!(stored.last_name, "Gómez");
    }

    #[tokio::test]
    async fn test_invalid_product_is_not_written() {
        let shop = fixtures::shop(10).await;
        let catalog = shop.db.catalog();

        let mut product = shop.product.clone();
        product.id = new_id();
        product.price_cents = 0;
        let err = catalog.add_product(&product).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.field() == "price"));

        product.price_cents = 500;
        product.name = "   ".to_string();
        let err = catalog.add_product(&product).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(shop.db.products().count().await.unwrap(), 1);

        let mut existing = shop.product.clone();
        existing.stock = -1;
        let err = catalog.update_product(&existing).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.field() == "stock"));
        let stored = shop.db.products().get_by_id(&shop.product.id).await.unwrap().unwrap();
        assert_eq!(stored.stock, 10);
    }

    #[tokio::test]
    async fn test_update_of_missing_product_is_not_found() {
        let shop = fixtures::shop(10).await;

        let mut product = shop.product.clone();
        product.id = "no-such-product".to_string();
        let err = shop.db.catalog().update_product(&product).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
