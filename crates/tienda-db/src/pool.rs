//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  CLI startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← path from TIENDA_DB_PATH or the data dir        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐                │  (max_connections)        │
//! │  │  │Conn1│ │Conn2│ │Conn3│ ...            │                           │
//! │  │  └─────┘ └─────┘ └─────┘                │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ├──► db.products() / db.sales() / db.clients() ...  (repos)      │
//! │       └──► db.sale_service() / db.reports()               (services)   │
//! │                                                                         │
//! │  Every accessor hands out a cheap clone of the same pool.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! WAL journaling lets a report read while a sale is being written.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::client::ClientRepository;
use crate::repository::product::ProductRepository;
use crate::repository::reference::{CategoryRepository, PaymentMethodRepository, ZoneRepository};
use crate::repository::sale::SaleRepository;
use crate::service::{CatalogService, ReportService, SaleService};

// =============================================================================
// Configuration
// =============================================================================

/// Where the ledger lives and how the pool around it behaves.
///
/// ```rust
/// use tienda_db::DbConfig;
///
/// let config = DbConfig::new("/tmp/tienda.db").max_connections(2);
/// assert_eq!(config.max_connections, 2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, created on first connect. `:memory:` for a throwaway store.
    pub database_path: PathBuf,
    /// Pool ceiling (default 5, `TIENDA_MAX_CONNECTIONS` in the CLI).
    pub max_connections: u32,
    pub min_connections: u32,
    /// Wait for a free connection before failing with `PoolExhausted`.
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    /// Apply embedded migrations in [`Database::new`].
    pub run_migrations: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// A private in-memory store for tests.
    ///
    /// Each SQLite connection to `:memory:` gets its own empty database, so
    /// the pool is pinned to one connection.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository and service access.
///
/// Replaces a process-wide shared connection: whoever needs the database is
/// handed a `Database` (or one of its repositories) explicitly.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::in_memory()).await?;
/// let zones = db.zones().list().await?;
/// let id = db.sale_service().record_sale(new_sale).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the store and brings its schema up to date.
    ///
    /// Connections run with foreign keys on and NORMAL synchronous; file
    /// databases also use WAL journaling.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening ledger database");

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let mut connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .synchronous(SqliteSynchronous::Normal)
            // SQLite ships with foreign keys off
            .foreign_keys(true)
            .create_if_missing(true);

        if !config.is_in_memory() {
            connect_options = connect_options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(
            max_connections = config.max_connections,
            in_memory = config.is_in_memory(),
            "Pool ready"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ----- repositories -----

    pub fn zones(&self) -> ZoneRepository {
        ZoneRepository::new(self.pool.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    pub fn payment_methods(&self) -> PaymentMethodRepository {
        PaymentMethodRepository::new(self.pool.clone())
    }

    pub fn clients(&self) -> ClientRepository {
        ClientRepository::new(self.pool.clone())
    }

    /// Returns the product repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let running_low = db.products().low_stock(5).await?;
    /// ```
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Returns the sale repository.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    // ----- services -----

    /// The stock-guarded sale workflow.
    pub fn sale_service(&self) -> SaleService {
        SaleService::new(self.pool.clone())
    }

    /// Validated client and product writes.
    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.pool.clone())
    }

    /// Sales reports built from the ledger.
    pub fn reports(&self) -> ReportService {
        ReportService::new(self.sales())
    }

    /// Waits for checked-out connections to return, then closes them.
    /// Repositories cloned from this handle fail afterwards.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// `SELECT 1` round-trip.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
