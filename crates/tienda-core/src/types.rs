//! # Domain Types
//!
//! Core domain types used throughout Tienda.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Client       │   │      Sale       │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  client_id      │   │  id (UUID)      │       │
//! │  │  zone_id ───────┼─┐ │  product_id ────┼──►│  category_id ───┼─┐     │
//! │  │  first/last     │ │ │  line: SaleLine │   │  price_cents    │ │     │
//! │  └─────────────────┘ │ │  payment_method │   │  stock          │ │     │
//! │                      │ └────────┬────────┘   └─────────────────┘ │     │
//! │  ┌─────────────────┐ │          │            ┌─────────────────┐ │     │
//! │  │      Zone       │◄┘          ▼            │    Category     │◄┘     │
//! │  │  city/province  │   ┌─────────────────┐   │  name           │       │
//! │  └─────────────────┘   │  PaymentMethod  │   └─────────────────┘       │
//! │                        │  1 Cash         │                              │
//! │                        │  2 Debit card   │                              │
//! │                        │  3 Credit card  │                              │
//! │                        │  4 Bank transfer│                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Sale Line Invariant
//! `SaleLine` keeps its fields private so that `total == quantity × unit_price`
//! holds at every observation point. The only way to change quantity or price
//! is through a setter that recomputes the total.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Reference Data
// =============================================================================

/// A geographic zone clients belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Zone {
    pub id: String,
    pub city: String,
    pub province: String,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// One of the fixed payment methods.
///
/// Seeded by the initial migration; ids are small positive integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PaymentMethod {
    pub id: i64,
    pub name: String,
}

impl PaymentMethod {
    pub const CASH: i64 = 1;
    pub const DEBIT_CARD: i64 = 2;
    pub const CREDIT_CARD: i64 = 3;
    pub const BANK_TRANSFER: i64 = 4;
}

// =============================================================================
// Client
// =============================================================================

/// A registered shop client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Client {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub age: i64,
    /// Zone the client lives in.
    pub zone_id: String,
    #[ts(as = "String")]
    pub registered_at: DateTime<Utc>,
    /// Soft delete flag.
    pub is_active: bool,
}

impl Client {
    /// "First Last", as shown in listings.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Category the product is listed under.
    pub category_id: String,

    /// Catalog price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the catalog price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// An inactive product or one with nothing on hand cannot be sold at all.
    #[inline]
    pub fn has_stock(&self) -> bool {
        self.is_active && self.stock > 0
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// Quantity, unit price and the total derived from them.
///
/// ## Example
/// ```rust
/// use tienda_core::{Money, SaleLine};
///
/// let mut line = SaleLine::new(2, Money::from_cents(500));
/// assert_eq!(line.total().cents(), 1000);
///
/// line.set_quantity(3);
/// assert_eq!(line.total().cents(), 1500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(from = "SaleLineInput")]
#[ts(export)]
pub struct SaleLine {
    quantity: i64,
    unit_price: Money,
    total: Money,
}

/// Incoming shape of a sale line: any supplied total is recomputed.
#[derive(Deserialize)]
struct SaleLineInput {
    quantity: i64,
    unit_price: Money,
}

impl From<SaleLineInput> for SaleLine {
    fn from(input: SaleLineInput) -> Self {
        SaleLine::new(input.quantity, input.unit_price)
    }
}

impl SaleLine {
    pub fn new(quantity: i64, unit_price: Money) -> Self {
        SaleLine {
            quantity,
            unit_price,
            total: unit_price.multiply_quantity(quantity),
        }
    }

    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    #[inline]
    pub fn total(&self) -> Money {
        self.total
    }

    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.recompute();
    }

    pub fn set_unit_price(&mut self, unit_price: Money) {
        self.unit_price = unit_price;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.total = self.unit_price.multiply_quantity(self.quantity);
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sale that has not been stored yet (no id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    pub sold_at: DateTime<Utc>,
    pub client_id: String,
    pub product_id: String,
    pub line: SaleLine,
    pub payment_method_id: i64,
}

impl NewSale {
    /// Builds a sale line from quantity and unit price.
    pub fn new(
        sold_at: DateTime<Utc>,
        client_id: impl Into<String>,
        product_id: impl Into<String>,
        quantity: i64,
        unit_price: Money,
        payment_method_id: i64,
    ) -> Self {
        NewSale {
            sold_at,
            client_id: client_id.into(),
            product_id: product_id.into(),
            line: SaleLine::new(quantity, unit_price),
            payment_method_id,
        }
    }
}

/// A stored sale: one client buying some units of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    /// Assigned by the store, never changed afterwards.
    pub id: String,
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
    pub client_id: String,
    pub product_id: String,
    pub line: SaleLine,
    pub payment_method_id: i64,
}

impl Sale {
    /// Attaches a store-assigned id to a new sale.
    pub fn from_new(id: impl Into<String>, new: NewSale) -> Self {
        Sale {
            id: id.into(),
            sold_at: new.sold_at,
            client_id: new.client_id,
            product_id: new.product_id,
            line: new.line,
            payment_method_id: new.payment_method_id,
        }
    }

    #[inline]
    pub fn quantity(&self) -> i64 {
        self.line.quantity()
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        self.line.unit_price()
    }

    #[inline]
    pub fn total(&self) -> Money {
        self.line.total()
    }

    pub fn set_quantity(&mut self, quantity: i64) {
        self.line.set_quantity(quantity);
    }

    pub fn set_unit_price(&mut self, unit_price: Money) {
        self.line.set_unit_price(unit_price);
    }

    /// Calendar day of the sale (UTC).
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.sold_at.date_naive()
    }

    /// ISO weekday number: 1 = Monday .. 7 = Sunday.
    #[inline]
    pub fn iso_weekday(&self) -> u32 {
        self.sold_at.weekday().number_from_monday()
    }
}

impl AsRef<Sale> for Sale {
    fn as_ref(&self) -> &Sale {
        self
    }
}

// =============================================================================
// Sale Detail
// =============================================================================

/// A sale joined with the names the grouped reports need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDetail {
    pub sale: Sale,
    pub product_name: String,
    pub category_name: String,
    pub payment_method_name: String,
}

impl AsRef<Sale> for SaleDetail {
    fn as_ref(&self) -> &Sale {
        &self.sale
    }
}

impl AsRef<SaleDetail> for SaleDetail {
    fn as_ref(&self) -> &SaleDetail {
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
