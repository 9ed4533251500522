//! # Repository Module
//!
//! Database repository implementations for Tienda.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CLI command / service                                                 │
//! │       │                                                                 │
//! │       │  db.products().low_stock(5)                                    │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, product)                                            │
//! │  ├── update(&self, product)                                            │
//! │  └── low_stock(&self, threshold)                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`reference`] - Zones, categories, payment methods
//! - [`client::ClientRepository`] - Client CRUD and lookups
//! - [`product::ProductRepository`] - Product CRUD, stock, lookups
//! - [`sale::SaleRepository`] - The sales ledger
//!
//! Every repository owns a clone of the pool; creating one is cheap.

use uuid::Uuid;

pub mod client;
pub mod product;
pub mod reference;
pub mod sale;

#[cfg(test)]
pub(crate) mod fixtures;

/// Generates an id for a new zone, category, client or product.
///
/// Sales get theirs from [`sale::SaleRepository::insert`].
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
