//! # In-Memory Gateway
//!
//! A [`Gateway`] backed by plain vectors, for tests and demos.
//!
//! It keeps the default (non-transactional) bill save, so a failing item
//! insert leaves an orphaned bill behind exactly as a remote backend
//! without transactions would. Failures can be switched on per operation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use fairbill_core::{
    Bill, BillItem, CatalogItem, Complaint, ItemType, NewBill, NewBillItem, NewCatalogItem,
    NewComplaint,
};
use fairbill_db::DbError;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Gateway;

#[derive(Debug, Default)]
struct Tables {
    medicines: Vec<CatalogItem>,
    procedures: Vec<CatalogItem>,
    bills: Vec<Bill>,
    bill_items: Vec<BillItem>,
    complaints: Vec<Complaint>,
    last_catalog_id: i64,
    last_bill_id: i64,
    last_bill_item_id: i64,
    last_complaint_id: i64,
    failures: Failures,
}

#[derive(Debug, Default, Clone, Copy)]
struct Failures {
    search: bool,
    bill_insert: bool,
    item_insert: bool,
}

impl Tables {
    fn catalog(&self, item_type: ItemType) -> &Vec<CatalogItem> {
        match item_type {
            ItemType::Medicine => &self.medicines,
            ItemType::Procedure => &self.procedures,
        }
    }
}

fn next(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

fn injected(operation: &str) -> GatewayError {
    GatewayError::Unavailable(format!("injected {operation} failure"))
}

/// In-process stand-in for the SQLite backend.
///
/// Clones share the same tables, so a test can hand one clone to a
/// checker and inspect state through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryGateway {
    /// Empty tables.
    pub fn new() -> Self {
        MemoryGateway::default()
    }

    /// Tables preloaded with the sample government catalog.
    pub async fn with_sample_catalog() -> Self {
        let gateway = MemoryGateway::new();
        for item_type in [ItemType::Medicine, ItemType::Procedure] {
            for row in fairbill_db::seed::sample_catalog(item_type) {
                gateway.add_catalog_item(item_type, row).await;
            }
        }
        gateway
    }

    /// Adds a catalog row and returns it with its assigned id.
    pub async fn add_catalog_item(&self, item_type: ItemType, row: NewCatalogItem) -> CatalogItem {
        let mut tables = self.tables.lock().await;
        let item = CatalogItem {
            id: next(&mut tables.last_catalog_id),
            name: row.name,
            category: row.category,
            unit: match item_type {
                ItemType::Medicine => row.unit,
                ItemType::Procedure => None,
            },
            govt_min_price: row.govt_min_price,
            govt_max_price: row.govt_max_price,
            created_at: Utc::now(),
        };

        match item_type {
            ItemType::Medicine => tables.medicines.push(item.clone()),
            ItemType::Procedure => tables.procedures.push(item.clone()),
        }
        item
    }

    /// Makes every catalog search fail.
    pub async fn fail_searches(&self, fail: bool) {
        self.tables.lock().await.failures.search = fail;
    }

    /// Makes every bill insert fail.
    pub async fn fail_bill_inserts(&self, fail: bool) {
        self.tables.lock().await.failures.bill_insert = fail;
    }

    /// Makes every bill item insert fail.
    pub async fn fail_item_inserts(&self, fail: bool) {
        self.tables.lock().await.failures.item_insert = fail;
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn list_catalog(&self, item_type: ItemType) -> GatewayResult<Vec<CatalogItem>> {
        let tables = self.tables.lock().await;
        let mut items = tables.catalog(item_type).clone();
        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn search_catalog(
        &self,
        item_type: ItemType,
        query: &str,
        limit: u32,
    ) -> GatewayResult<Vec<CatalogItem>> {
        let tables = self.tables.lock().await;
        if tables.failures.search {
            return Err(injected("search"));
        }

        let hits: Vec<CatalogItem> = tables
            .catalog(item_type)
            .iter()
            .filter(|item| item.name_matches(query))
            .take(limit as usize)
            .cloned()
            .collect();

        debug!(query = %query.trim(), count = hits.len(), "Memory catalog search");
        Ok(hits)
    }

    async fn insert_bill(&self, bill: NewBill) -> GatewayResult<Bill> {
        let mut tables = self.tables.lock().await;
        if tables.failures.bill_insert {
            return Err(injected("bill insert"));
        }

        let bill = bill.into_bill(next(&mut tables.last_bill_id), Utc::now());
        tables.bills.push(bill.clone());
        Ok(bill)
    }

    async fn insert_bill_items(&self, items: Vec<NewBillItem>) -> GatewayResult<Vec<BillItem>> {
        let mut tables = self.tables.lock().await;
        if tables.failures.item_insert {
            return Err(injected("bill item insert"));
        }

        // Checked up front so a bad batch writes nothing
        if let Some(orphan) = items
            .iter()
            .find(|item| !tables.bills.iter().any(|bill| bill.id == item.bill_id))
        {
            return Err(GatewayError::Db(DbError::ForeignKeyViolation {
                message: format!("bill {} does not exist", orphan.bill_id),
            }));
        }

        let now = Utc::now();
        let mut saved = Vec::with_capacity(items.len());
        for item in items {
            let item = item.into_bill_item(next(&mut tables.last_bill_item_id), now);
            tables.bill_items.push(item.clone());
            saved.push(item);
        }
        Ok(saved)
    }

    async fn list_bills(&self) -> GatewayResult<Vec<Bill>> {
        let mut bills = self.tables.lock().await.bills.clone();
        bills.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(bills)
    }

    async fn get_bill(&self, id: i64) -> GatewayResult<Option<Bill>> {
        let tables = self.tables.lock().await;
        Ok(tables.bills.iter().find(|bill| bill.id == id).cloned())
    }

    async fn list_bill_items(&self, bill_id: i64) -> GatewayResult<Vec<BillItem>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .bill_items
            .iter()
            .filter(|item| item.bill_id == bill_id)
            .cloned()
            .collect())
    }

    async fn insert_complaint(&self, complaint: NewComplaint) -> GatewayResult<Complaint> {
        let mut tables = self.tables.lock().await;
        let complaint = complaint.into_complaint(next(&mut tables.last_complaint_id), Utc::now());
        tables.complaints.push(complaint.clone());
        Ok(complaint)
    }

    async fn list_complaints(&self) -> GatewayResult<Vec<Complaint>> {
        let mut complaints = self.tables.lock().await.complaints.clone();
        complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(complaints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fairbill_core::Money;

    fn bill() -> NewBill {
        NewBill {
            patient_name: "Asha".to_string(),
            hospital_name: "City Hospital".to_string(),
            bill_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            total_amount: Money::from_minor(300),
            verified: true,
            overcharged: false,
        }
    }

    fn item() -> NewBillItem {
        NewBillItem {
            bill_id: 0,
            item_type: ItemType::Medicine,
            item_id: 1,
            item_name: "Paracetamol 500mg".to_string(),
            charged_price: Money::from_minor(300),
            govt_max_price: Money::from_minor(500),
            is_overcharged: false,
        }
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_partial() {
        let gateway = MemoryGateway::with_sample_catalog().await;

        let hits = gateway
            .search_catalog(ItemType::Medicine, "PARACETAMOL", 10)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Paracetamol 500mg");

        let hits = gateway.search_catalog(ItemType::Medicine, "mg", 2).await.unwrap();
        assert_eq!(hits.len(), 2);

        let hits = gateway.search_catalog(ItemType::Procedure, "mg", 10).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_default_save_reports_partial_write() {
        let gateway = MemoryGateway::new();
        gateway.fail_item_inserts(true).await;

        let err = gateway
            .insert_bill_with_items(bill(), vec![item()])
            .await
            .unwrap_err();
        let bill_id = match err {
            GatewayError::PartialWrite { bill_id, .. } => bill_id,
            other => panic!("expected partial write, got {other:?}"),
        };

        // The bill stays behind without items
        assert!(gateway.get_bill(bill_id).await.unwrap().is_some());
        assert!(gateway.list_bill_items(bill_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_orphan_items_rejected() {
        let gateway = MemoryGateway::new();
        let err = gateway
            .insert_bill_items(vec![NewBillItem { bill_id: 5, ..item() }])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Db(DbError::ForeignKeyViolation { .. })));
    }

    #[tokio::test]
    async fn test_clones_share_tables() {
        let gateway = MemoryGateway::new();
        let observer = gateway.clone();

        gateway.insert_bill(bill()).await.unwrap();
        assert_eq!(observer.list_bills().await.unwrap().len(), 1);
    }
}
