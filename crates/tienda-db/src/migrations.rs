//! # Schema Migrations
//!
//! The SQL under `migrations/sqlite/` is compiled into the binary and applied
//! by [`Database::new`](crate::Database::new).
//!
//! ```text
//! 001_initial_schema.sql
//!   zones ◄── clients ◄──┐
//!                        ├── sales ──► payment_methods (1..4, seeded)
//!   categories ◄── products ◄┘
//! ```
//!
//! Applied files are recorded in `_sqlx_migrations` with their checksum, so
//! an edited migration fails to apply. Schema changes go in a new
//! `NNN_description.sql`.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let before = migration_status(pool).await?;
    if before.is_current() {
        debug!(applied = before.applied, "Schema up to date");
        return Ok(());
    }

    MIGRATOR.run(pool).await?;

    info!(
        from = before.applied,
        to = before.embedded,
        "Schema migrated"
    );
    Ok(())
}

/// How far the store's schema is behind the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    pub embedded: usize,
    pub applied: usize,
}

impl MigrationStatus {
    pub fn is_current(&self) -> bool {
        self.applied >= self.embedded
    }
}

pub async fn migration_status(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    // Missing until the first run
    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await
            .unwrap_or(0);

    Ok(MigrationStatus {
        embedded: MIGRATOR.migrations.len(),
        applied: usize::try_from(applied).unwrap_or(0),
    })
}
