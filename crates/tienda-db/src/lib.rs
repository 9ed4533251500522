//! # tienda-db: Database Layer for Tienda
//!
//! This crate provides database access for the Tienda system.
//! It uses SQLite for local storage with sqlx for async operations, and owns
//! the one multi-step write the shop performs: recording a sale while taking
//! its units out of stock.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tienda Data Flow                                 │
//! │                                                                         │
//! │  CLI command (sell / report / restock)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tienda-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Services    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │               │    │               │    │  (embedded)  │  │   │
//! │  │   │ SaleService   │───►│ ProductRepo   │    │              │  │   │
//! │  │   │ ReportService │    │ SaleRepo      │    │ 001_init.sql │  │   │
//! │  │   │               │    │ ClientRepo... │    │              │  │   │
//! │  │   └───────┬───────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │           │                    │                               │   │
//! │  │           └──────► Database (pool.rs): SqlitePool              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/tienda/tienda.db                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (client, product, sale, ...)
//! - [`service`] - Stock-guarded sale workflow and sales reports
//! - [`seed`] - Deterministic demo data
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tienda_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/tienda.db")).await?;
//!
//! let sale_id = db.sale_service().record_sale(new_sale).await?;
//! let low = db.products().low_stock(5).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::client::ClientRepository;
pub use repository::product::ProductRepository;
pub use repository::reference::{CategoryRepository, PaymentMethodRepository, ZoneRepository};
pub use repository::sale::SaleRepository;

pub use service::{ReportService, SaleService, ServiceError, ServiceResult};
