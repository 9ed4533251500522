//! # tienda-core: Pure Business Logic for Tienda
//!
//! This crate holds the shop's business rules and sales statistics as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tienda Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    tienda CLI (apps/tienda-cli)                 │   │
//! │  │        report ──► sell ──► restock ──► low-stock ──► seed       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tienda-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   stock   │  │ analytics │  │   │
//! │  │   │  Product  │  │   Money   │  │ can sell? │  │ daily sum │  │   │
//! │  │   │   Sale    │  │           │  │           │  │  pearson  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tienda-db (Database Layer)                   │   │
//! │  │        SQLite repositories, migrations, sale workflow           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Client, Product, Sale, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Field and record validation
//! - [`stock`] - The no-oversell rule
//! - [`stats`] - Mean, population standard deviation, Pearson correlation
//! - [`analytics`] - Sales ledger statistics built on [`stats`]
//! - [`clock`] - Injected "today" for date-relative totals
//!
//! ## Example Usage
//!
//! ```rust
//! use tienda_core::money::Money;
//! use tienda_core::types::SaleLine;
//!
//! let line = SaleLine::new(3, Money::from_cents(1050));
//! assert_eq!(line.total().cents(), 3150);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod clock;
pub mod error;
pub mod money;
pub mod stats;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level at or below which a product is reported as running low.
///
/// Overridable per invocation (`low-stock --threshold`) and through
/// `TIENDA_LOW_STOCK_THRESHOLD`.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Number of rows in the default "top selling products" ranking.
pub const DEFAULT_TOP_PRODUCTS: i64 = 10;
