//! # Sales Analytics Engine
//!
//! Pure functions over an already-fetched slice of sales. Nothing here
//! touches the database, mutates its input, or remembers anything between
//! calls.
//!
//! ## Inputs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   &[S] where S: AsRef<Sale>          &[D] where D: AsRef<SaleDetail>   │
//! │   ─────────────────────────          ───────────────────────────────   │
//! │   daily_totals                       totals_by_category                │
//! │   average_daily_total                top_selling_products              │
//! │   std_dev_daily_total                totals_by_payment_method          │
//! │   correlation_price_vs_quantity                                         │
//! │   correlation_weekday_vs_quantity    (need product / category /        │
//! │   total_today, total_this_month       payment method names)            │
//! │                                                                         │
//! │   Both accept owned values or references (Vec<&SaleDetail> works).     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Degenerate Inputs
//! Empty slices give empty lists and `0.0`; they never produce an error.
//!
//! ## Ordering
//! Grouped results are sorted descending by their measure. Ties are broken
//! by name, ascending, so output is stable across runs.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use ts_rs::TS;

use crate::clock::Clock;
use crate::money::Money;
use crate::stats::{self, CorrelationStrength};
use crate::types::{Sale, SaleDetail};

// =============================================================================
// Result Types
// =============================================================================

/// Sum of sale totals for one calendar day that had at least one sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyTotal {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total: Money,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductSales {
    pub product_id: String,
    pub product_name: String,
    pub units_sold: i64,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentMethodTotal {
    pub payment_method_id: i64,
    pub method: String,
    pub total: Money,
    pub count: u64,
    /// Mean sale total in major units.
    pub average_per_sale: f64,
}

/// A coefficient together with its reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Correlation {
    pub coefficient: f64,
    pub strength: CorrelationStrength,
}

impl Correlation {
    pub fn new(coefficient: f64) -> Self {
        Correlation {
            coefficient,
            strength: CorrelationStrength::classify(coefficient),
        }
    }
}

// =============================================================================
// Daily Statistics
// =============================================================================

/// Per-day totals for sales dated within `[start, end]`, ascending by date.
///
/// Days without sales are left out rather than filled with zero.
pub fn daily_totals<S: AsRef<Sale>>(sales: &[S], start: NaiveDate, end: NaiveDate) -> Vec<DailyTotal> {
    let mut by_day: BTreeMap<NaiveDate, (Money, u64)> = BTreeMap::new();

    for sale in sales.iter().map(AsRef::<Sale>::as_ref) {
        let date = sale.date();
        if date < start || date > end {
            continue;
        }
        let entry = by_day.entry(date).or_insert((Money::zero(), 0));
        entry.0 += sale.total();
        entry.1 += 1;
    }

    by_day
        .into_iter()
        .map(|(date, (total, count))| DailyTotal { date, total, count })
        .collect()
}

fn daily_values<S: AsRef<Sale>>(sales: &[S], start: NaiveDate, end: NaiveDate) -> Vec<f64> {
    daily_totals(sales, start, end)
        .iter()
        .map(|day| day.total.to_major_units())
        .collect()
}

/// Mean of the per-day totals in major units; `0.0` when no day had sales.
pub fn average_daily_total<S: AsRef<Sale>>(sales: &[S], start: NaiveDate, end: NaiveDate) -> f64 {
    stats::mean(&daily_values(sales, start, end))
}

/// Population standard deviation of the per-day totals in major units.
pub fn std_dev_daily_total<S: AsRef<Sale>>(sales: &[S], start: NaiveDate, end: NaiveDate) -> f64 {
    stats::population_std_dev(&daily_values(sales, start, end))
}

// =============================================================================
// Correlations
// =============================================================================

/// Pearson correlation between unit price and quantity, one point per sale.
///
/// Prices go in as whole cents; the coefficient doesn't depend on the unit.
pub fn correlation_price_vs_quantity<S: AsRef<Sale>>(sales: &[S]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = sales
        .iter()
        .map(AsRef::<Sale>::as_ref)
        .map(|s| (s.unit_price().cents() as f64, s.quantity() as f64))
        .unzip();
    stats::pearson(&xs, &ys)
}

/// Pearson correlation between the ISO weekday number (1..7) and quantity.
///
/// The weekday is used as a plain linear value.
pub fn correlation_weekday_vs_quantity<S: AsRef<Sale>>(sales: &[S]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = sales
        .iter()
        .map(AsRef::<Sale>::as_ref)
        .map(|s| (f64::from(s.iso_weekday()), s.quantity() as f64))
        .unzip();
    stats::pearson(&xs, &ys)
}

// =============================================================================
// Date-Relative Totals
// =============================================================================

/// Sum of totals for sales dated today.
pub fn total_today<S: AsRef<Sale>>(sales: &[S], clock: &impl Clock) -> Money {
    let today = clock.today();
    sales
        .iter()
        .map(AsRef::<Sale>::as_ref)
        .filter(|s| s.date() == today)
        .map(Sale::total)
        .sum()
}

/// Sum of totals for sales dated in the current calendar month.
pub fn total_this_month<S: AsRef<Sale>>(sales: &[S], clock: &impl Clock) -> Money {
    let today = clock.today();
    sales
        .iter()
        .map(AsRef::<Sale>::as_ref)
        .filter(|s| {
            let date = s.date();
            date.year() == today.year() && date.month() == today.month()
        })
        .map(Sale::total)
        .sum()
}

// =============================================================================
// Grouped Totals
// =============================================================================

fn by_total_then_name(a: (Money, &str), b: (Money, &str)) -> Ordering {
    b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1))
}

/// Sale totals grouped by the category of the product sold.
pub fn totals_by_category<D: AsRef<SaleDetail>>(details: &[D]) -> Vec<CategoryTotal> {
    let mut groups: HashMap<&str, (Money, u64)> = HashMap::new();

    for detail in details.iter().map(AsRef::<SaleDetail>::as_ref) {
        let entry = groups
            .entry(detail.category_name.as_str())
            .or_insert((Money::zero(), 0));
        entry.0 += detail.sale.total();
        entry.1 += 1;
    }

    let mut rows: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category: category.to_string(),
            total,
            count,
        })
        .collect();
    rows.sort_by(|a, b| by_total_then_name((a.total, a.category.as_str()), (b.total, b.category.as_str())));
    rows
}

/// Best sellers by units sold, at most `limit` rows.
///
/// `limit <= 0` yields an empty list. Equal unit counts are ordered by
/// product name.
pub fn top_selling_products<D: AsRef<SaleDetail>>(details: &[D], limit: i64) -> Vec<ProductSales> {
    if limit <= 0 {
        return Vec::new();
    }

    let mut groups: HashMap<&str, ProductSales> = HashMap::new();
    for detail in details.iter().map(AsRef::<SaleDetail>::as_ref) {
        let entry = groups
            .entry(detail.sale.product_id.as_str())
            .or_insert_with(|| ProductSales {
                product_id: detail.sale.product_id.clone(),
                product_name: detail.product_name.clone(),
                units_sold: 0,
                total: Money::zero(),
            });
        entry.units_sold += detail.sale.quantity();
        entry.total += detail.sale.total();
    }

    let mut rows: Vec<ProductSales> = groups.into_values().collect();
    rows.sort_by(|a, b| {
        b.units_sold
            .cmp(&a.units_sold)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    rows
}

/// Sale totals grouped by payment method, with the mean ticket per method.
pub fn totals_by_payment_method<D: AsRef<SaleDetail>>(details: &[D]) -> Vec<PaymentMethodTotal> {
    let mut groups: HashMap<i64, (&str, Money, u64)> = HashMap::new();

    for detail in details.iter().map(AsRef::<SaleDetail>::as_ref) {
        let entry = groups
            .entry(detail.sale.payment_method_id)
            .or_insert((detail.payment_method_name.as_str(), Money::zero(), 0));
        entry.1 += detail.sale.total();
        entry.2 += 1;
    }

    let mut rows: Vec<PaymentMethodTotal> = groups
        .into_iter()
        .map(|(id, (name, total, count))| PaymentMethodTotal {
            payment_method_id: id,
            method: name.to_string(),
            total,
            count,
            average_per_sale: total.to_major_units() / count as f64,
        })
        .collect();
    rows.sort_by(|a, b| by_total_then_name((a.total, a.method.as_str()), (b.total, b.method.as_str())));
    rows
}

// =============================================================================
// Full Report
// =============================================================================

/// Everything the `report` command shows, computed in one pass over the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    #[ts(as = "String")]
    pub from: NaiveDate,
    #[ts(as = "String")]
    pub to: NaiveDate,
    /// Number of sales dated within `[from, to]`.
    pub sales_in_range: u64,
    pub daily_totals: Vec<DailyTotal>,
    pub average_daily_total: f64,
    pub std_dev_daily_total: f64,
    pub by_category: Vec<CategoryTotal>,
    pub top_products: Vec<ProductSales>,
    pub by_payment_method: Vec<PaymentMethodTotal>,
    pub price_vs_quantity: Correlation,
    pub weekday_vs_quantity: Correlation,
    pub total_today: Money,
    pub total_this_month: Money,
}

impl SalesReport {
    /// Builds a report for `[from, to]`.
    ///
    /// Range statistics, grouped totals and correlations only see sales inside
    /// the range. Today and this-month totals look at all of `details`.
    pub fn build(
        details: &[SaleDetail],
        from: NaiveDate,
        to: NaiveDate,
        top_limit: i64,
        clock: &impl Clock,
    ) -> Self {
        let in_range: Vec<&SaleDetail> = details
            .iter()
            .filter(|d| {
                let date = d.sale.date();
                date >= from && date <= to
            })
            .collect();

        SalesReport {
            from,
            to,
            sales_in_range: in_range.len() as u64,
            daily_totals: daily_totals(&in_range, from, to),
            average_daily_total: average_daily_total(&in_range, from, to),
            std_dev_daily_total: std_dev_daily_total(&in_range, from, to),
            by_category: totals_by_category(&in_range),
            top_products: top_selling_products(&in_range, top_limit),
            by_payment_method: totals_by_payment_method(&in_range),
            price_vs_quantity: Correlation::new(correlation_price_vs_quantity(&in_range)),
            weekday_vs_quantity: Correlation::new(correlation_weekday_vs_quantity(&in_range)),
            total_today: total_today(details, clock),
            total_this_month: total_this_month(details, clock),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
