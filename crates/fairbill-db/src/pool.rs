//! # Database Handle
//!
//! Opens the Fairbill SQLite file, applies pending migrations and hands out
//! repositories.
//!
//! ## Opening Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  DbConfig::new("~/.local/share/fairbill/fairbill.db")                   │
//! │       │                                                                 │
//! │       ├── file path: create parent dir, WAL journal, NORMAL sync        │
//! │       └── ":memory:": private database, one pinned connection           │
//! │       │                                                                 │
//! │       ▼  foreign_keys = ON  (bill_items.bill_id → bills.id)             │
//! │  SqlitePool (max_connections)                                           │
//! │       │                                                                 │
//! │       ▼  MIGRATOR.run (unless disabled)                                 │
//! │  Database                                                               │
//! │       ├── catalog()    ──► CatalogRepository    medicines, procedures   │
//! │       ├── bills()      ──► BillRepository       bills, bill_items       │
//! │       └── complaints() ──► ComplaintRepository  complaints              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::bill::BillRepository;
use crate::repository::catalog::CatalogRepository;
use crate::repository::complaint::ComplaintRepository;

const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives and how the pool behaves.
///
/// ```rust,ignore
/// let config = DbConfig::new("fairbill.db").max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`.
    pub database_path: PathBuf,
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long `acquire` waits for a free connection.
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    /// Apply pending migrations when opening.
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed database. The file and its directory are created on
    /// first open.
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

    /// Private in-memory database for tests.
    ///
    /// Every SQLite connection to `:memory:` sees its own empty database, so
    /// the pool is pinned to a single connection that is never recycled.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            ..DbConfig::new(MEMORY_PATH)
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

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == MEMORY_PATH
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
        };

        Ok(options.foreign_keys(true))
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .acquire_timeout(self.connect_timeout);

        if self.is_in_memory() {
            // Dropping the only connection would drop the database with it
            options.idle_timeout(None).max_lifetime(None)
        } else {
            options.idle_timeout(Some(self.idle_timeout))
        }
    }
}

/// Creates the directory holding the database file.
fn ensure_parent_dir(config: &DbConfig) -> DbResult<()> {
    if config.is_in_memory() {
        return Ok(());
    }

    match config.database_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| {
                DbError::ConnectionFailed(format!("cannot create {}: {e}", parent.display()))
            }),
        _ => Ok(()),
    }
}

// =============================================================================
// Database
// =============================================================================

/// Open database. Clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database described by `config`.
    ///
    /// ## Errors
    /// * `DbError::ConnectionFailed` - directory or file could not be opened
    /// * `DbError::MigrationFailed` - the schema could not be brought up to date
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening database");

        ensure_parent_dir(&config)?;
        let options = config.connect_options()?;

        let pool = config
            .pool_options()
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(
            in_memory = config.is_in_memory(),
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    /// Applies pending migrations. `new()` already does this unless it was
    /// turned off in the config.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Raw pool, for queries no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Medicines and procedures.
    pub fn catalog(&self) -> CatalogRepository {
        CatalogRepository::new(self.pool.clone())
    }

    /// Bills and their items.
    pub fn bills(&self) -> BillRepository {
        BillRepository::new(self.pool.clone())
    }

    pub fn complaints(&self) -> ComplaintRepository {
        ComplaintRepository::new(self.pool.clone())
    }

    /// Closes every connection. Later queries fail.
    pub async fn close(&self) {
        debug!("Closing database pool");
        self.pool.close().await;
    }

    /// `true` while the pool can still run a query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_has_schema() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);

        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
        assert_eq!(db.bills().counts().await.unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn test_closed_pool_fails_health_check() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[tokio::test]
    async fn test_file_database_creates_directory() {
        let dir = std::env::temp_dir().join(format!("fairbill-pool-{}", std::process::id()));
        let path = dir.join("nested").join("fairbill.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert!(path.exists());
        db.close().await;

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/fairbill.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());

        let memory = DbConfig::in_memory();
        assert!(memory.is_in_memory());
        assert_eq!(memory.max_connections, 1);
    }
}
