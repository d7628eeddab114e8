//! # Remote Data Gateway
//!
//! The only door between the checker/verifier and storage.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │                      trait Gateway: Send + Sync                         │
//! │                                  │                                      │
//! │             ┌────────────────────┴────────────────────┐                 │
//! │             ▼                                         ▼                 │
//! │   fairbill_db::Database                        MemoryGateway            │
//! │   ─────────────────────                        ─────────────            │
//! │   SQLite via repositories                      Vec tables behind a      │
//! │   bill + items: one transaction                tokio Mutex; failure     │
//! │   stats: COUNT(*) queries                      injection for tests      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Not found" is never an error: lookups return `Ok(None)` or an empty
//! `Vec`. Everything else a backend can fail with is a [`GatewayError`].

use async_trait::async_trait;
use fairbill_core::{
    Bill, BillDetails, BillItem, CatalogItem, Complaint, DashboardStats, ItemType, NewBill,
    NewBillItem, NewComplaint,
};
use fairbill_db::Database;

use crate::error::{GatewayError, GatewayResult};

// =============================================================================
// Gateway Trait
// =============================================================================

/// Reads and inserts against the five Fairbill tables.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Every entry of one catalog table, ordered by name.
    async fn list_catalog(&self, item_type: ItemType) -> GatewayResult<Vec<CatalogItem>>;

    /// Case-insensitive partial name match, first `limit` rows in the
    /// backend's default order.
    async fn search_catalog(
        &self,
        item_type: ItemType,
        query: &str,
        limit: u32,
    ) -> GatewayResult<Vec<CatalogItem>>;

    async fn insert_bill(&self, bill: NewBill) -> GatewayResult<Bill>;

    /// Insert-many for bill items.
    async fn insert_bill_items(&self, items: Vec<NewBillItem>) -> GatewayResult<Vec<BillItem>>;

    /// Writes a bill, then its items under the new bill id.
    ///
    /// The default runs the two inserts in sequence. When the item insert
    /// fails after the bill was stored it returns
    /// [`GatewayError::PartialWrite`] carrying the orphaned bill id.
    /// Backends with transactions override this to be all or nothing.
    async fn insert_bill_with_items(
        &self,
        bill: NewBill,
        items: Vec<NewBillItem>,
    ) -> GatewayResult<(Bill, Vec<BillItem>)> {
        let bill = self.insert_bill(bill).await?;

        let items = items
            .into_iter()
            .map(|item| NewBillItem {
                bill_id: bill.id,
                ..item
            })
            .collect();

        match self.insert_bill_items(items).await {
            Ok(saved) => Ok((bill, saved)),
            Err(err) => Err(GatewayError::PartialWrite {
                bill_id: bill.id,
                reason: err.to_string(),
            }),
        }
    }

    /// All bills, newest first.
    async fn list_bills(&self) -> GatewayResult<Vec<Bill>>;

    async fn get_bill(&self, id: i64) -> GatewayResult<Option<Bill>>;

    async fn list_bill_items(&self, bill_id: i64) -> GatewayResult<Vec<BillItem>>;

    /// A bill with its items, or `None` if the bill does not exist.
    async fn bill_details(&self, id: i64) -> GatewayResult<Option<BillDetails>> {
        let Some(bill) = self.get_bill(id).await? else {
            return Ok(None);
        };
        let items = self.list_bill_items(id).await?;
        Ok(Some(BillDetails { bill, items }))
    }

    async fn insert_complaint(&self, complaint: NewComplaint) -> GatewayResult<Complaint>;

    /// All complaints, newest first.
    async fn list_complaints(&self) -> GatewayResult<Vec<Complaint>>;

    /// Dashboard counts. The default downloads every bill and complaint and
    /// counts client-side.
    async fn stats(&self) -> GatewayResult<DashboardStats> {
        let bills = self.list_bills().await?;
        let complaints = self.list_complaints().await?;
        Ok(DashboardStats::from_records(&bills, &complaints))
    }
}

// =============================================================================
// SQLite Gateway
// =============================================================================

#[async_trait]
impl Gateway for Database {
    async fn list_catalog(&self, item_type: ItemType) -> GatewayResult<Vec<CatalogItem>> {
        Ok(self.catalog().list(item_type).await?)
    }

    async fn search_catalog(
        &self,
        item_type: ItemType,
        query: &str,
        limit: u32,
    ) -> GatewayResult<Vec<CatalogItem>> {
        Ok(self.catalog().search(item_type, query, limit).await?)
    }

    async fn insert_bill(&self, bill: NewBill) -> GatewayResult<Bill> {
        Ok(self.bills().insert(&bill).await?)
    }

    async fn insert_bill_items(&self, items: Vec<NewBillItem>) -> GatewayResult<Vec<BillItem>> {
        Ok(self.bills().insert_items(&items).await?)
    }

    async fn insert_bill_with_items(
        &self,
        bill: NewBill,
        items: Vec<NewBillItem>,
    ) -> GatewayResult<(Bill, Vec<BillItem>)> {
        Ok(self.bills().insert_with_items(&bill, items).await?)
    }

    async fn list_bills(&self) -> GatewayResult<Vec<Bill>> {
        Ok(self.bills().list().await?)
    }

    async fn get_bill(&self, id: i64) -> GatewayResult<Option<Bill>> {
        Ok(self.bills().get(id).await?)
    }

    async fn list_bill_items(&self, bill_id: i64) -> GatewayResult<Vec<BillItem>> {
        Ok(self.bills().items(bill_id).await?)
    }

    async fn insert_complaint(&self, complaint: NewComplaint) -> GatewayResult<Complaint> {
        Ok(self.complaints().insert(&complaint).await?)
    }

    async fn list_complaints(&self) -> GatewayResult<Vec<Complaint>> {
        Ok(self.complaints().list().await?)
    }

    async fn stats(&self) -> GatewayResult<DashboardStats> {
        let (total, overcharged) = self.bills().counts().await?;
        let complaints = self.complaints().count().await?;
        Ok(DashboardStats::from_counts(total, overcharged, complaints))
    }
}
