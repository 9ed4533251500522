//! Subcommand handlers.
//!
//! Each handler talks to the database through repositories and services and
//! prints its result. Text rendering lives in `render_*` functions so it can
//! be tested without a terminal.

use std::fmt::Write as _;

use anyhow::{anyhow, bail, Context};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use tienda_core::analytics::{Correlation, SalesReport};
use tienda_core::{Clock, Money, NewSale, Product, SystemClock};
use tienda_db::seed::{SeedOptions, SeedSummary};
use tienda_db::Database;

// =============================================================================
// report
// =============================================================================

pub async fn report(
    db: &Database,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    top: i64,
    json: bool,
) -> anyhow::Result<()> {
    let clock = SystemClock;
    let (from, to) = default_range(from, to, clock.today());

    let report = db.reports().sales_report(from, to, top, &clock).await?;

    if json {
        print_json(&report)
    } else {
        print!("{}", render_report(&report));
        Ok(())
    }
}

/// Missing bounds default to the month of `today`, up to `today`.
fn default_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let to = to.unwrap_or(today);
    let from = from.unwrap_or_else(|| to.with_day(1).unwrap_or(to));
    (from, to)
}

fn render_report(report: &SalesReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Sales report {} .. {}", report.from, report.to);
    let _ = writeln!(out, "Sales in range: {}", report.sales_in_range);
    let _ = writeln!(out);

    let _ = writeln!(out, "Daily totals");
    if report.daily_totals.is_empty() {
        let _ = writeln!(out, "  (no sales)");
    }
    for day in &report.daily_totals {
        let _ = writeln!(out, "  {}  {:>12}  {:>4} sales", day.date, day.total, day.count);
    }
    let _ = writeln!(out, "  average   {:.2}", report.average_daily_total);
    let _ = writeln!(out, "  std dev   {:.2}", report.std_dev_daily_total);
    let _ = writeln!(out);

    let _ = writeln!(out, "By category");
    for row in &report.by_category {
        let _ = writeln!(out, "  {:<24} {:>12}  {:>4} sales", row.category, row.total, row.count);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Top products");
    for (rank, row) in report.top_products.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {:<24} {:>6} units  {:>12}",
            rank + 1,
            row.product_name,
            row.units_sold,
            row.total
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "By payment method");
    for row in &report.by_payment_method {
        let _ = writeln!(
            out,
            "  {:<16} {:>12}  {:>4} sales  avg {:.2}",
            row.method, row.total, row.count, row.average_per_sale
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Correlations");
    let _ = writeln!(out, "  price vs quantity    {}", render_correlation(&report.price_vs_quantity));
    let _ = writeln!(out, "  weekday vs quantity  {}", render_correlation(&report.weekday_vs_quantity));
    let _ = writeln!(out);

    let _ = writeln!(out, "Total today       {}", report.total_today);
    let _ = writeln!(out, "Total this month  {}", report.total_this_month);

    out
}

fn render_correlation(c: &Correlation) -> String {
    format!("{:+.3} ({})", c.coefficient, c.strength)
}

// =============================================================================
// sell / restock
// =============================================================================

#[derive(Debug, Serialize)]
struct SaleReceipt {
    sale_id: String,
    product: String,
    quantity: i64,
    unit_price: Money,
    total: Money,
    remaining_stock: i64,
}

pub async fn sell(
    db: &Database,
    client_id: &str,
    product_id: &str,
    quantity: i64,
    method: i64,
    price_cents: Option<i64>,
    json: bool,
) -> anyhow::Result<()> {
    let product = find_product(db, product_id).await?;
    let unit_price = price_cents.map(Money::from_cents).unwrap_or_else(|| product.price());

    let sale = NewSale::new(Utc::now(), client_id, product_id, quantity, unit_price, method);
    let total = sale.line.total();

    let sale_id = db.sale_service().record_sale(sale).await?;
    let remaining_stock = find_product(db, product_id).await?.stock;

    let receipt = SaleReceipt {
        sale_id,
        product: product.name,
        quantity,
        unit_price,
        total,
        remaining_stock,
    };

    if json {
        return print_json(&receipt);
    }

    println!(
        "Sale {}: {} x {} @ {} = {} ({} left)",
        receipt.sale_id,
        receipt.quantity,
        receipt.product,
        receipt.unit_price,
        receipt.total,
        receipt.remaining_stock
    );
    Ok(())
}

pub async fn restock(db: &Database, product_id: &str, stock: i64) -> anyhow::Result<()> {
    db.sale_service().set_stock(product_id, stock).await?;
    info!(product_id, stock, "Stock set");
    println!("Stock of {product_id} set to {stock}");
    Ok(())
}

async fn find_product(db: &Database, product_id: &str) -> anyhow::Result<Product> {
    db.products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| anyhow!("Product not found: {product_id}"))
}

// =============================================================================
// low-stock
// =============================================================================

pub async fn low_stock(db: &Database, threshold: i64, json: bool) -> anyhow::Result<()> {
    if threshold < 0 {
        bail!("--threshold must be zero or positive");
    }

    let products = db.products().low_stock(threshold).await?;

    if json {
        print_json(&products)
    } else {
        print!("{}", render_low_stock(&products, threshold));
        Ok(())
    }
}

fn render_low_stock(products: &[Product], threshold: i64) -> String {
    let mut out = String::new();
    if products.is_empty() {
        let _ = writeln!(out, "No active products at or below {threshold} units");
        return out;
    }

    let _ = writeln!(out, "Products at or below {threshold} units");
    for p in products {
        let _ = writeln!(out, "  {:>5}  {:<32} {}", p.stock, p.name, p.id);
    }
    out
}

// =============================================================================
// seed
// =============================================================================

pub async fn seed(
    db: &Database,
    clients: usize,
    products: usize,
    sales: usize,
    json: bool,
) -> anyhow::Result<()> {
    let options = SeedOptions {
        clients,
        products,
        sales,
        end: SystemClock.today(),
    };

    let summary = tienda_db::seed::seed(db, &options)
        .await
        .context("seeding demo data")?;

    if json {
        print_json(&summary)
    } else {
        print!("{}", render_seed(&summary));
        Ok(())
    }
}

fn render_seed(summary: &SeedSummary) -> String {
    if summary.skipped {
        return "Database already has products; nothing seeded\n".to_string();
    }
    format!(
        "Seeded {} zones, {} categories, {} products, {} clients, {} sales ({} refused for stock)\n",
        summary.zones,
        summary.categories,
        summary.products,
        summary.clients,
        summary.sales,
        summary.refused
    )
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
