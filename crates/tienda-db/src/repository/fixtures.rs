//! Test records inserted through the repositories.

use chrono::{TimeZone, Utc};
use tienda_core::{Category, Client, Product, Zone};

use super::new_id;
use crate::Database;

pub async fn zone(db: &Database, city: &str, province: &str) -> Zone {
    let zone = Zone {
        id: new_id(),
        city: city.to_string(),
        province: province.to_string(),
    };
    db.zones().insert(&zone).await.unwrap()
}

pub async fn category(db: &Database, name: &str) -> Category {
    let category = Category {
        id: new_id(),
        name: name.to_string(),
        description: None,
    };
    db.categories().insert(&category).await.unwrap()
}

pub async fn client(db: &Database, zone_id: &str, first_name: &str, last_name: &str) -> Client {
    let client = Client {
        id: new_id(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        phone: Some("3415550100".to_string()),
        email: Some(format!("{}@example.com", first_name.to_lowercase())),
        age: 34,
        zone_id: zone_id.to_string(),
        registered_at: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
        is_active: true,
    };
    db.clients().insert(&client).await.unwrap()
}

pub async fn product(
    db: &Database,
    category_id: &str,
    name: &str,
    price_cents: i64,
    stock: i64,
) -> Product {
    let product = Product {
        id: new_id(),
        name: name.to_string(),
        description: None,
        category_id: category_id.to_string(),
        price_cents,
        stock,
        is_active: true,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
    };
    db.products().insert(&product).await.unwrap()
}

/// One zone, one category, one client and one product with `stock` units.
pub struct Shop {
    pub db: Database,
    pub zone: Zone,
    pub category: Category,
    pub client: Client,
    pub product: Product,
}

pub async fn shop(stock: i64) -> Shop {
    let db = Database::new(crate::DbConfig::in_memory()).await.unwrap();
    let zone = zone(&db, "Rosario", "Santa Fe").await;
    let category = category(&db, "Hygiene").await;
    let client = client(&db, &zone.id, "Ana", "Pérez").await;
    let product = product(&db, &category.id, "Shampoo", 1250, stock).await;
    Shop {
        db,
        zone,
        category,
        client,
        product,
    }
}
