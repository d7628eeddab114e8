//! Embedded schema migrations.
//!
//! The SQL lives in `migrations/sqlite/` at the workspace root and is
//! compiled into the binary, so `fairbill` needs no files besides the
//! database itself. Applied versions are tracked in `_sqlx_migrations`;
//! add a new numbered file for every schema change instead of editing an
//! applied one.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every migration not yet recorded. A no-op on an up-to-date
/// database.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let (total, applied) = migration_status(pool).await?;
    if applied >= total {
        debug!(total, "Schema up to date");
        return Ok(());
    }

    MIGRATOR.run(pool).await?;
    info!(pending = total - applied, total, "Migrations applied");
    Ok(())
}

/// `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    // No bookkeeping table before the first run
    let applied: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1",
    )
    .fetch_one(pool)
    .await
    .unwrap_or(0);

    Ok((total, applied as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        assert_eq!(migration_status(db.pool()).await.unwrap().1, 0);

        run_migrations(db.pool()).await.unwrap();
        run_migrations(db.pool()).await.unwrap();

        let (total, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }
}
