//! # Demo Data Generator
//!
//! Fills an empty database with zones, categories, products, clients and
//! sales for trying out reports.
//!
//! ## Determinism
//! Every field is derived from the record's index (no RNG), so the same
//! options always produce the same shop. Sales are spread over the 60 days
//! ending at `SeedOptions::end` and are recorded through
//! [`SaleService::record_sale`](crate::SaleService::record_sale), so stock
//! is decremented and oversells are refused exactly as in real use. Only
//! stock refusals are counted and skipped; any other error ends the run.
//!
//! ```text
//! seed = index
//! price  = 199 + (seed × 17 mod 800) + category addon   cents
//! stock  = 20 + (seed × 31 mod 80)
//! sale i → client (i × 7), product (i × 13), qty 1 + (i × 5 mod 4),
//!          day end − (i × 11 mod 60), method 1 + (i mod 4)
//! ```

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::repository::new_id;
use crate::service::{ServiceError, ServiceResult};
use crate::Database;
use tienda_core::{Category, Client, NewSale, Product, Zone};

const ZONES: &[(&str, &str)] = &[
    ("Rosario", "Santa Fe"),
    ("Santa Fe", "Santa Fe"),
    ("Córdoba", "Córdoba"),
    ("Villa María", "Córdoba"),
    ("La Plata", "Buenos Aires"),
    ("Mar del Plata", "Buenos Aires"),
    ("Mendoza", "Mendoza"),
    ("Salta", "Salta"),
];

/// Category name, description, price addon in cents, product names.
const CATEGORIES: &[(&str, &str, i64, &[&str])] = &[
    (
        "Almacén",
        "Dry groceries",
        0,
        &["Yerba 1kg", "Arroz 1kg", "Fideos 500g", "Harina 1kg", "Azúcar 1kg", "Aceite 900ml"],
    ),
    (
        "Bebidas",
        "Drinks",
        50,
        &["Agua 2L", "Gaseosa 1.5L", "Jugo 1L", "Cerveza 1L", "Vino tinto 750ml"],
    ),
    (
        "Limpieza",
        "Cleaning supplies",
        150,
        &["Lavandina 1L", "Detergente 750ml", "Jabón en polvo 800g", "Esponja x3"],
    ),
    (
        "Perfumería",
        "Personal care",
        250,
        &["Shampoo 400ml", "Acondicionador 400ml", "Jabón de tocador", "Pasta dental 90g"],
    ),
    (
        "Snacks",
        "Sweet and salty snacks",
        25,
        &["Alfajor triple", "Galletitas dulces", "Papas fritas 150g", "Maní salado 200g"],
    ),
];

const FIRST_NAMES: &[&str] = &[
    "Ana", "Lucía", "Martín", "Sofía", "Juan", "Valentina", "Pedro", "Camila", "Diego", "Julieta",
];

const LAST_NAMES: &[&str] = &[
    "Pérez", "Gómez", "Rodríguez", "Fernández", "López", "Martínez", "Sosa", "Romero",
];

const SALE_WINDOW_DAYS: i64 = 60;

/// How much data to generate.
#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub clients: usize,
    pub products: usize,
    pub sales: usize,
    /// Last day of the sale window.
    pub end: NaiveDate,
}

impl SeedOptions {
    pub fn new(end: NaiveDate) -> Self {
        SeedOptions {
            clients: 25,
            products: 20,
            sales: 200,
            end,
        }
    }
}

/// What a seed run inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub zones: usize,
    pub categories: usize,
    pub clients: usize,
    pub products: usize,
    pub sales: usize,
    /// Sales the workflow refused for lack of stock.
    pub refused: usize,
    /// True when the database already had products and nothing was done.
    pub skipped: bool,
}

/// Populates an empty database. Does nothing if any product exists.
pub async fn seed(db: &Database, options: &SeedOptions) -> ServiceResult<SeedSummary> {
    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has products, skipping seed");
        return Ok(SeedSummary {
            skipped: true,
            ..SeedSummary::default()
        });
    }

    info!(
        clients = options.clients,
        products = options.products,
        sales = options.sales,
        "Seeding demo data"
    );

    let mut summary = SeedSummary::default();

    let mut zone_ids = Vec::with_capacity(ZONES.len());
    for (city, province) in ZONES {
        let zone = Zone {
            id: new_id(),
            city: city.to_string(),
            province: province.to_string(),
        };
        db.zones().insert(&zone).await?;
        zone_ids.push(zone.id);
    }
    summary.zones = zone_ids.len();

    let mut categories = Vec::with_capacity(CATEGORIES.len());
    for (name, description, _, _) in CATEGORIES {
        let category = Category {
            id: new_id(),
            name: name.to_string(),
            description: Some(description.to_string()),
        };
        db.categories().insert(&category).await?;
        categories.push(category.id);
    }
    summary.categories = categories.len();

    let catalog = db.catalog();
    let now = Utc::now();
    let mut products = Vec::with_capacity(options.products);
    for seed in 0..options.products {
        let product = generate_product(seed, &categories, now);
        catalog.add_product(&product).await?;
        products.push(product);
    }
    summary.products = products.len();

    let mut clients = Vec::with_capacity(options.clients);
    for seed in 0..options.clients {
        let client = generate_client(seed, &zone_ids, now);
        catalog.add_client(&client).await?;
        clients.push(client);
    }
    summary.clients = clients.len();

    if !clients.is_empty() && !products.is_empty() {
        let service = db.sale_service();
        for i in 0..options.sales {
            let client = &clients[(i * 7) % clients.len()];
            let product = &products[(i * 13) % products.len()];
            let sale = generate_sale(i, client, product, options.end);

            match service.record_sale(sale).await {
                Ok(_) => summary.sales += 1,
                Err(ServiceError::InsufficientStock { .. }) => summary.refused += 1,
                Err(e) => {
                    warn!(error = %e, sale = i, "Seed aborted");
                    return Err(e);
                }
            }
        }
    }

    info!(
        sales = summary.sales,
        refused = summary.refused,
        "Seed complete"
    );

    Ok(summary)
}

fn generate_product(seed: usize, category_ids: &[String], now: chrono::DateTime<Utc>) -> Product {
    let category_idx = seed % CATEGORIES.len();
    let (_, _, price_addon, names) = CATEGORIES[category_idx];
    let base_name = names[(seed / CATEGORIES.len()) % names.len()];

    // Past the first lap through the catalog, names get a variant suffix
    let lap = seed / (CATEGORIES.len() * names.len());
    let name = if lap == 0 {
        base_name.to_string()
    } else {
        format!("{base_name} #{}", lap + 1)
    };

    Product {
        id: new_id(),
        name,
        description: None,
        category_id: category_ids[category_idx].clone(),
        price_cents: 199 + ((seed * 17) % 800) as i64 + price_addon,
        stock: 20 + ((seed * 31) % 80) as i64,
        is_active: true,
        created_at: now,
    }
}

fn generate_client(seed: usize, zone_ids: &[String], now: chrono::DateTime<Utc>) -> Client {
    let first_name = FIRST_NAMES[seed % FIRST_NAMES.len()];
    let last_name = LAST_NAMES[(seed / FIRST_NAMES.len() + seed) % LAST_NAMES.len()];

    Client {
        id: new_id(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        phone: Some(format!("341{:07}", 5_550_000 + seed)),
        email: Some(format!("cliente{seed}@example.com")),
        age: 18 + ((seed * 13) % 60) as i64,
        zone_id: zone_ids[seed % zone_ids.len()].clone(),
        registered_at: now - Duration::days(((seed * 29) % 365) as i64),
        is_active: true,
    }
}

fn generate_sale(i: usize, client: &Client, product: &Product, end: NaiveDate) -> NewSale {
    let days_back = ((i * 11) as i64) % SALE_WINDOW_DAYS;
    let day = end - Duration::days(days_back);
    let hour = 9 + (i % 10) as u32;
    let sold_at = Utc
        .from_utc_datetime(&day.and_hms_opt(hour, ((i * 7) % 60) as u32, 0).unwrap_or_default());

    NewSale::new(
        sold_at,
        &client.id,
        &product.id,
        1 + ((i * 5) % 4) as i64,
        product.price(),
        1 + (i % 4) as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[tokio::test]
    async fn test_seed_populates_and_keeps_invariants() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let options = SeedOptions {
            clients: 5,
            products: 8,
            sales: 40,
            end: end(),
        };

        let summary = seed(&db, &options).await.unwrap();
        assert!(!summary.skipped);
        assert_eq!(summary.zones, ZONES.len());
        assert_eq!(summary.products, 8);
        assert_eq!(summary.clients, 5);
        assert_eq!(summary.sales + summary.refused, 40);
        assert_eq!(db.sales().count().await.unwrap() as usize, summary.sales);

        for product in db.products().list().await.unwrap() {
            assert!(product.stock >= 0);
        }

        let start = end() - Duration::days(SALE_WINDOW_DAYS - 1);
        let in_window = db.sales().list_by_date_range(start, end()).await.unwrap();
        assert_eq!(in_window.len(), summary.sales);
    }

    #[tokio::test]
    async fn test_seed_skips_populated_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let options = SeedOptions {
            clients: 2,
            products: 2,
            sales: 0,
            end: end(),
        };

        seed(&db, &options).await.unwrap();
        let second = seed(&db, &options).await.unwrap();
        assert!(second.skipped);
        assert_eq!(db.products().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_seed_stops_on_errors_other_than_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("DELETE FROM payment_methods WHERE id = 2")
            .execute(db.pool())
            .await
            .unwrap();
        let options = SeedOptions {
            clients: 2,
            products: 2,
            sales: 4,
            end: end(),
        };

        let err = seed(&db, &options).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { ref entity, .. } if entity == "PaymentMethod"));
        // Sale 0 went through before sale 1 hit the missing method
        assert_eq!(db.sales().count().await.unwrap(), 1);
    }

    #[test]
    fn test_generated_records_are_valid() {
        let ids: Vec<String> = (0..CATEGORIES.len()).map(|i| format!("c{i}")).collect();
        let zones: Vec<String> = vec!["z".to_string()];
        let now = Utc::now();

        for seed in 0..60 {
            let product = generate_product(seed, &ids, now);
            tienda_core::validation::validate_product(&product).unwrap();
            let client = generate_client(seed, &zones, now);
            tienda_core::validation::validate_client(&client).unwrap();
        }
    }
}
