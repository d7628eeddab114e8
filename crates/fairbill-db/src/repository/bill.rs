//! # Bill Repository
//!
//! Database operations for bills and bill items.
//!
//! ## Bill Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Bill Lifecycle                                    │
//! │                                                                         │
//! │  1. VERIFY (fairbill-audit, in memory)                                 │
//! │     └── BillVerification { items, total_overcharge, ... }              │
//! │                                                                         │
//! │  2. SAVE (one transaction)                                             │
//! │     └── insert_with_items()                                            │
//! │         ├── INSERT INTO bills        → bill id                         │
//! │         └── INSERT INTO bill_items   × matched lines (bill_id = id)    │
//! │         (any failure rolls back both)                                  │
//! │                                                                         │
//! │  3. READ                                                               │
//! │     └── list() newest first, get(id), items(bill_id), counts()         │
//! │                                                                         │
//! │  No update or delete path exists.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use fairbill_core::{Bill, BillItem, NewBill, NewBillItem};

/// Repository for bill database operations.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Creates a new BillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Inserts a bill on its own (quick checks, or gateways composing their
    /// own item writes).
    pub async fn insert(&self, bill: &NewBill) -> DbResult<Bill> {
        let mut conn = self.pool.acquire().await?;
        insert_bill(&mut conn, bill).await
    }

    /// Inserts a batch of bill items. All or nothing.
    pub async fn insert_items(&self, items: &[NewBillItem]) -> DbResult<Vec<BillItem>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut saved = Vec::with_capacity(items.len());
        for item in items {
            saved.push(insert_bill_item(&mut tx, item.clone()).await?);
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(saved)
    }

    /// Inserts a bill and its items in a single transaction.
    ///
    /// The `bill_id` carried by each item is replaced with the new bill's id.
    /// If any insert fails the transaction is dropped and nothing is stored.
    pub async fn insert_with_items(
        &self,
        bill: &NewBill,
        items: Vec<NewBillItem>,
    ) -> DbResult<(Bill, Vec<BillItem>)> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let saved_bill = insert_bill(&mut tx, bill).await?;

        let mut saved_items = Vec::with_capacity(items.len());
        for item in items {
            let item = NewBillItem {
                bill_id: saved_bill.id,
                ..item
            };
            saved_items.push(insert_bill_item(&mut tx, item).await?);
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            bill_id = saved_bill.id,
            items = saved_items.len(),
            overcharged = saved_bill.overcharged,
            "Bill saved"
        );
        Ok((saved_bill, saved_items))
    }

    /// Lists all bills, newest first.
    pub async fn list(&self) -> DbResult<Vec<Bill>> {
        let bills = sqlx::query_as::<_, Bill>(
            r#"
            SELECT
                id, patient_name, hospital_name, bill_date,
                total_amount, verified, overcharged, created_at
            FROM bills
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = bills.len(), "Listed bills");
        Ok(bills)
    }

    /// Gets a bill by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Bill))` - Bill found
    /// * `Ok(None)` - Bill not found
    pub async fn get(&self, id: i64) -> DbResult<Option<Bill>> {
        let bill = sqlx::query_as::<_, Bill>(
            r#"
            SELECT
                id, patient_name, hospital_name, bill_date,
                total_amount, verified, overcharged, created_at
            FROM bills
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bill)
    }

    /// Items of one bill, in insertion order.
    pub async fn items(&self, bill_id: i64) -> DbResult<Vec<BillItem>> {
        let items = sqlx::query_as::<_, BillItem>(
            r#"
            SELECT
                id, bill_id, item_type, item_id, item_name,
                charged_price, govt_max_price, is_overcharged, created_at
            FROM bill_items
            WHERE bill_id = ?1
            ORDER BY id
            "#,
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// `(total_bills, overcharged_bills)`.
    pub async fn counts(&self) -> DbResult<(i64, i64)> {
        let counts: (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(overcharged), 0) FROM bills",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }
}

// =============================================================================
// Connection-level helpers
// =============================================================================
// Shared by the pooled and transactional paths.

async fn insert_bill(conn: &mut SqliteConnection, bill: &NewBill) -> DbResult<Bill> {
    debug!(
        patient = %bill.patient_name,
        hospital = %bill.hospital_name,
        total = %bill.total_amount,
        "Inserting bill"
    );

    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO bills (
            patient_name, hospital_name, bill_date,
            total_amount, verified, overcharged, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&bill.patient_name)
    .bind(&bill.hospital_name)
    .bind(bill.bill_date)
    .bind(bill.total_amount)
    .bind(bill.verified)
    .bind(bill.overcharged)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(bill.clone().into_bill(result.last_insert_rowid(), now))
}

/// ## Snapshot Pattern
/// Catalog name and ceiling are copied onto the row, so later catalog edits
/// never rewrite a saved bill.
async fn insert_bill_item(conn: &mut SqliteConnection, item: NewBillItem) -> DbResult<BillItem> {
    debug!(bill_id = item.bill_id, item = %item.item_name, "Inserting bill item");

    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO bill_items (
            bill_id, item_type, item_id, item_name,
            charged_price, govt_max_price, is_overcharged, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(item.bill_id)
    .bind(item.item_type)
    .bind(item.item_id)
    .bind(&item.item_name)
    .bind(item.charged_price)
    .bind(item.govt_max_price)
    .bind(item.is_overcharged)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(item.into_bill_item(result.last_insert_rowid(), now))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::NaiveDate;
    use fairbill_core::{ItemType, Money};

    fn new_bill(patient: &str, overcharged: bool) -> NewBill {
        NewBill {
            patient_name: patient.to_string(),
            hospital_name: "City Hospital".to_string(),
            bill_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            total_amount: Money::from_minor(1300),
            verified: true,
            overcharged,
        }
    }

    fn new_item(bill_id: i64, name: &str) -> NewBillItem {
        NewBillItem {
            bill_id,
            item_type: ItemType::Medicine,
            item_id: 1,
            item_name: name.to_string(),
            charged_price: Money::from_minor(300),
            govt_max_price: Money::from_minor(500),
            is_overcharged: false,
        }
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = db().await;
        let saved = db.bills().insert(&new_bill("Asha", true)).await.unwrap();

        let fetched = db.bills().get(saved.id).await.unwrap().unwrap();
        assert_eq!(fetched.patient_name, "Asha");
        assert_eq!(fetched.total_amount, Money::from_minor(1300));
        assert!(fetched.overcharged);
        assert_eq!(fetched.bill_date, saved.bill_date);

        assert!(db.bills().get(saved.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_with_items_assigns_bill_id() {
        let db = db().await;
        let items = vec![new_item(0, "Paracetamol 500mg"), new_item(0, "ECG")];

        let (bill, saved_items) = db
            .bills()
            .insert_with_items(&new_bill("Asha", false), items)
            .await
            .unwrap();

        assert_eq!(saved_items.len(), 2);
        assert!(saved_items.iter().all(|item| item.bill_id == bill.id));

        let stored = db.bills().items(bill.id).await.unwrap();
        let names: Vec<_> = stored.iter().map(|i| i.item_name.as_str()).collect();
        assert_eq!(names, vec!["Paracetamol 500mg", "ECG"]);
        assert_eq!(stored[0].item_type, ItemType::Medicine);
    }

    #[tokio::test]
    async fn test_orphan_items_rejected_by_foreign_key() {
        let db = db().await;

        let err = db
            .bills()
            .insert_items(&[new_item(999, "ECG")])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert!(db.bills().items(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first_and_counts() {
        let db = db().await;
        let first = db.bills().insert(&new_bill("First", true)).await.unwrap();
        let second = db.bills().insert(&new_bill("Second", false)).await.unwrap();

        let bills = db.bills().list().await.unwrap();
        assert_eq!(bills.len(), 2);
        assert_eq!(bills[0].id, second.id);
        assert_eq!(bills[1].id, first.id);

        assert_eq!(db.bills().counts().await.unwrap(), (2, 1));
    }
}
