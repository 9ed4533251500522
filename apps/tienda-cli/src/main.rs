//! # tienda: Command-Line Front End
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              tienda CLI                                 │
//! │                                                                         │
//! │  main.rs ─────► tracing, config, database, dispatch                    │
//! │  config.rs ───► AppConfig from TIENDA_* environment variables          │
//! │  commands.rs ─► report | sell | restock | low-stock | seed             │
//! │                                                                         │
//! │                 ┌──────────────┐     ┌──────────────┐                  │
//! │                 │ tienda-core  │◄────│  tienda-db   │                  │
//! │                 │  analytics   │     │ SaleService  │                  │
//! │                 └──────────────┘     └──────────────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Parse arguments
//! 3. Load configuration
//! 4. Connect to database and run migrations
//! 5. Run the subcommand

mod commands;
mod config;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use tienda_db::{Database, DbConfig};

#[derive(Debug, Parser)]
#[command(name = "tienda", version, about = "Sales ledger and analytics for a small shop")]
struct Cli {
    /// Render output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sales statistics for a date range (defaults to the current month)
    Report {
        /// First day, YYYY-MM-DD
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day, YYYY-MM-DD
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Size of the top products ranking
        #[arg(long)]
        top: Option<i64>,
    },

    /// Record a sale, refusing it if stock is short
    Sell {
        #[arg(long)]
        client: String,
        #[arg(long)]
        product: String,
        #[arg(long)]
        quantity: i64,
        /// Payment method id (1 cash, 2 debit, 3 credit, 4 transfer)
        #[arg(long)]
        method: i64,
        /// Unit price in cents; the catalog price when omitted
        #[arg(long)]
        price: Option<i64>,
    },

    /// Set a product's stock to an absolute value
    Restock {
        #[arg(long)]
        product: String,
        #[arg(long)]
        stock: i64,
    },

    /// Active products at or below a stock threshold
    LowStock {
        #[arg(long)]
        threshold: Option<i64>,
    },

    /// Fill an empty database with demo data
    Seed {
        #[arg(long, default_value_t = 25)]
        clients: usize,
        #[arg(long, default_value_t = 20)]
        products: usize,
        #[arg(long, default_value_t = 200)]
        sales: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::load().context("loading configuration")?;
    debug!(?config, "Configuration loaded");

    let db = Database::new(
        DbConfig::new(&config.db_path).max_connections(config.max_connections),
    )
    .await
    .with_context(|| format!("opening database {}", config.db_path.display()))?;

    info!(db_path = %config.db_path.display(), "Database ready");

    let result = run(&cli, &config, &db).await;
    db.close().await;
    result
}

async fn run(cli: &Cli, config: &AppConfig, db: &Database) -> anyhow::Result<()> {
    match &cli.command {
        Command::Report { from, to, top } => {
            let top = top.unwrap_or(config.top_products);
            commands::report(db, *from, *to, top, cli.json).await
        }
        Command::Sell {
            client,
            product,
            quantity,
            method,
            price,
        } => commands::sell(db, client, product, *quantity, *method, *price, cli.json).await,
        Command::Restock { product, stock } => commands::restock(db, product, *stock).await,
        Command::LowStock { threshold } => {
            let threshold = threshold.unwrap_or(config.low_stock_threshold);
            commands::low_stock(db, threshold, cli.json).await
        }
        Command::Seed {
            clients,
            products,
            sales,
        } => commands::seed(db, *clients, *products, *sales, cli.json).await,
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tienda_db=trace` - Trace the database layer only
/// - Default: `info,tienda=debug,sqlx=warn`
///
/// Logs go to stderr so `--json` output stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tienda=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
