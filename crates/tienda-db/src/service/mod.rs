//! # Services
//!
//! Operations that span more than one table or combine the store with the
//! analytics engine.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleService     record_sale, reduce_stock, set_stock,                  │
//! │                  update_sale, delete_sale                               │
//! │                  (one transaction per write, ServiceError taxonomy)     │
//! │                                                                         │
//! │  CatalogService  add/update client and product, validated first         │
//! │                                                                         │
//! │  ReportService   sales_report: ledger → tienda_core::analytics          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod catalog;
mod error;
mod report;
mod sale;

pub use catalog::CatalogService;
pub use error::{ServiceError, ServiceResult};
pub use report::ReportService;
pub use sale::SaleService;
