//! # Catalog Repository
//!
//! Read access to the government price catalog, plus the inserts used for
//! seeding.
//!
//! ## One Repository, Two Tables
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ItemType::Medicine  ──► medicines  (id, name, category, unit, ...)    │
//! │  ItemType::Procedure ──► procedures (id, name, category, ...)          │
//! │                                     └─ no unit column: NULL AS unit    │
//! │                                                                         │
//! │  search(Medicine, "para", 10)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT ... FROM medicines ORDER BY id                                 │
//! │       │                                                                 │
//! │       ▼  CatalogItem::name_matches (Unicode case folding), take 10     │
//! │  [Paracetamol 500mg]  ← first match is what the checker uses           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Table names come from [`ItemType::table_name`], never from user input.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use fairbill_core::{CatalogItem, ItemType, NewCatalogItem};

/// Repository for the `medicines` and `procedures` tables.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Lists every entry of one catalog table, ordered by name.
    pub async fn list(&self, item_type: ItemType) -> DbResult<Vec<CatalogItem>> {
        debug!(table = item_type.table_name(), "Listing catalog");

        let sql = format!("{} ORDER BY name, id", select_clause(item_type));
        let items = sqlx::query_as::<_, CatalogItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Case-insensitive partial name match.
    ///
    /// Results come back in insertion order (`id`), so the first hit is
    /// stable across calls. Matching happens here rather than in `LIKE`,
    /// which folds ASCII case only.
    ///
    /// ## Arguments
    /// * `query` - Partial name (already validated as non-empty)
    /// * `limit` - Maximum results to return
    pub async fn search(
        &self,
        item_type: ItemType,
        query: &str,
        limit: u32,
    ) -> DbResult<Vec<CatalogItem>> {
        let query = query.trim();

        debug!(table = item_type.table_name(), query = %query, limit = %limit, "Searching catalog");

        let sql = format!("{} ORDER BY id", select_clause(item_type));
        let items: Vec<CatalogItem> = sqlx::query_as::<_, CatalogItem>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .filter(|item| item.name_matches(query))
            .take(limit as usize)
            .collect();

        debug!(count = items.len(), "Search returned catalog items");
        Ok(items)
    }

    /// Inserts a catalog entry.
    ///
    /// A range with `govt_min_price > govt_max_price` is rejected by the
    /// table's CHECK constraint (`DbError::CheckViolation`).
    pub async fn insert(&self, item_type: ItemType, item: &NewCatalogItem) -> DbResult<CatalogItem> {
        debug!(table = item_type.table_name(), name = %item.name, "Inserting catalog item");

        let now = Utc::now();
        let result = match item_type {
            ItemType::Medicine => {
                sqlx::query(
                    r#"
                    INSERT INTO medicines (name, category, govt_min_price, govt_max_price, unit, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                )
                .bind(&item.name)
                .bind(&item.category)
                .bind(item.govt_min_price)
                .bind(item.govt_max_price)
                .bind(&item.unit)
                .bind(now)
                .execute(&self.pool)
                .await?
            }
            ItemType::Procedure => {
                sqlx::query(
                    r#"
                    INSERT INTO procedures (name, category, govt_min_price, govt_max_price, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                )
                .bind(&item.name)
                .bind(&item.category)
                .bind(item.govt_min_price)
                .bind(item.govt_max_price)
                .bind(now)
                .execute(&self.pool)
                .await?
            }
        };

        Ok(CatalogItem {
            id: result.last_insert_rowid(),
            name: item.name.clone(),
            category: item.category.clone(),
            unit: match item_type {
                ItemType::Medicine => item.unit.clone(),
                ItemType::Procedure => None,
            },
            govt_min_price: item.govt_min_price,
            govt_max_price: item.govt_max_price,
            created_at: now,
        })
    }

    /// Counts the rows of one catalog table.
    pub async fn count(&self, item_type: ItemType) -> DbResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", item_type.table_name());
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;

        Ok(count)
    }

    /// Loads the sample catalog into every table that is still empty.
    ///
    /// ## Returns
    /// `(medicines_inserted, procedures_inserted)`; zero for a table that
    /// already had rows.
    pub async fn seed_defaults(&self) -> DbResult<(usize, usize)> {
        let medicines = self.seed_table(ItemType::Medicine).await?;
        let procedures = self.seed_table(ItemType::Procedure).await?;

        info!(medicines, procedures, "Sample catalog seeded");
        Ok((medicines, procedures))
    }

    async fn seed_table(&self, item_type: ItemType) -> DbResult<usize> {
        let existing = self.count(item_type).await?;
        if existing > 0 {
            debug!(table = item_type.table_name(), existing, "Catalog already populated");
            return Ok(0);
        }

        let rows = crate::seed::sample_catalog(item_type);
        for row in &rows {
            self.insert(item_type, row).await?;
        }

        Ok(rows.len())
    }
}

/// Shared column list; procedures project a NULL unit.
fn select_clause(item_type: ItemType) -> String {
    let unit = match item_type {
        ItemType::Medicine => "unit",
        ItemType::Procedure => "NULL AS unit",
    };

    format!(
        "SELECT id, name, category, {unit}, govt_min_price, govt_max_price, created_at FROM {}",
        item_type.table_name()
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};
    use fairbill_core::Money;

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.catalog().seed_defaults().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(db.catalog().seed_defaults().await.unwrap(), (5, 5));
        assert_eq!(db.catalog().seed_defaults().await.unwrap(), (0, 0));
        assert_eq!(db.catalog().count(ItemType::Medicine).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_partial() {
        let db = seeded().await;

        let hits = db
            .catalog()
            .search(ItemType::Medicine, "PARACETAMOL", 10)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Paracetamol 500mg");
        assert_eq!(hits[0].govt_max_price, Money::from_minor(500));
        assert_eq!(hits[0].unit.as_deref(), Some("tablet"));

        let hits = db
            .catalog()
            .search(ItemType::Procedure, "ray", 10)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "X-Ray Chest");
        assert!(hits[0].unit.is_none());
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii_case() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let row = NewCatalogItem::new("Ácido Fólico 5mg", "Vitamin", 100, 300, Some("tablet"));
        db.catalog().insert(ItemType::Medicine, &row).await.unwrap();

        let hits = db.catalog().search(ItemType::Medicine, "ácido", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Ácido Fólico 5mg");

        let hits = db.catalog().search(ItemType::Medicine, "FÓLICO", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_search_respects_type_and_limit() {
        let db = seeded().await;

        // "ECG" is a procedure, not a medicine
        let hits = db.catalog().search(ItemType::Medicine, "ECG", 10).await.unwrap();
        assert!(hits.is_empty());

        // "mg" matches every medicine
        let hits = db.catalog().search(ItemType::Medicine, "mg", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "Paracetamol 500mg");

        let hits = db.catalog().search(ItemType::Medicine, "%", 10).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_list_ordered_by_name() {
        let db = seeded().await;

        let names: Vec<String> = db
            .catalog()
            .list(ItemType::Procedure)
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 5);
    }

    #[tokio::test]
    async fn test_invalid_range_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let bad = NewCatalogItem::new("Backwards", "Test", 900, 100, None);

        let err = db.catalog().insert(ItemType::Procedure, &bad).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }
}
