//! # Bill Verifier
//!
//! Holds the line items of one bill for a single session, verifies them
//! against the catalog, and saves the result.
//!
//! ## Session
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  add_item ─┐                                                            │
//! │  add_item ─┼──► items: Vec<BillLineItem>  (input order)                 │
//! │  add_item ─┘         │                                                  │
//! │                      ▼                                                  │
//! │  verify_bill()   one lookup per line, sequential, in order              │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  BillVerification { items (matched), unmatched, totals }               │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  save_bill(patient, hospital, date)                                    │
//! │      total_amount = Σ charged price of ALL lines                       │
//! │      gateway.insert_bill_with_items(bill, matched items)               │
//! │                                                                         │
//! │  clear_items() ──► empty session                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use fairbill_core::validation::{
    validate_charged_price, validate_hospital_name, validate_item_name, validate_line_items,
    validate_person_name,
};
use fairbill_core::verification::charged_total;
use fairbill_core::{
    Bill, BillItem, BillLineItem, BillVerification, NewBill, ValidationError, MAX_BILL_ITEMS,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::checker::PriceChecker;
use crate::error::{AuditError, AuditResult};
use crate::gateway::Gateway;

/// What `save_bill` stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBill {
    pub bill_id: i64,
    pub bill: Bill,
    pub items: Vec<BillItem>,
    pub verification: BillVerification,
}

/// Line items of one bill under verification.
#[derive(Debug, Clone)]
pub struct BillVerifier<G> {
    checker: PriceChecker<G>,
    items: Vec<BillLineItem>,
}

impl<G: Gateway> BillVerifier<G> {
    pub fn new(gateway: G) -> Self {
        BillVerifier::from_checker(PriceChecker::new(gateway))
    }

    /// Reuses a configured checker (currency format included).
    pub fn from_checker(checker: PriceChecker<G>) -> Self {
        BillVerifier {
            checker,
            items: Vec::new(),
        }
    }

    pub fn checker(&self) -> &PriceChecker<G> {
        &self.checker
    }

    /// Appends a line item.
    ///
    /// The name is trimmed; an empty name, a negative price or a full bill
    /// is rejected.
    pub fn add_item(&mut self, item: BillLineItem) -> AuditResult<()> {
        let name = validate_item_name(&item.name)?;
        validate_charged_price(item.price)?;

        if self.items.len() >= MAX_BILL_ITEMS {
            return Err(ValidationError::TooManyItems {
                max: MAX_BILL_ITEMS,
            }
            .into());
        }

        debug!(item = %name, item_type = %item.item_type, price = %item.price, "Adding bill item");
        self.items.push(BillLineItem { name, ..item });
        Ok(())
    }

    pub fn clear_items(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[BillLineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Verifies every line in order. Lines without a catalog match land in
    /// `unmatched` and count toward nothing.
    pub async fn verify_bill(&self) -> AuditResult<BillVerification> {
        let mut results = Vec::with_capacity(self.items.len());
        for line in &self.items {
            let assessment = self
                .checker
                .assess(line.item_type, &line.name, line.price)
                .await;
            results.push((line.clone(), assessment));
        }

        let verification = BillVerification::collect(results)?;
        debug!(
            matched = verification.items.len(),
            unmatched = verification.unmatched.len(),
            total_overcharge = %verification.total_overcharge,
            "Bill verified"
        );
        Ok(verification)
    }

    /// Verifies and stores the bill with one item row per matched line.
    ///
    /// ## Errors
    /// * `AuditError::Validation` - bad header, no line items, or totals
    ///   too large to store
    /// * `AuditError::BillNotSaved` - nothing was stored
    /// * `AuditError::ItemsNotSaved` - the bill row exists without items
    pub async fn save_bill(
        &self,
        patient_name: &str,
        hospital_name: &str,
        bill_date: NaiveDate,
    ) -> AuditResult<SavedBill> {
        let patient_name = validate_person_name(patient_name)?;
        let hospital_name = validate_hospital_name(hospital_name)?;
        validate_line_items(&self.items)?;

        let verification = self.verify_bill().await?;

        let bill = NewBill {
            patient_name,
            hospital_name,
            bill_date,
            total_amount: charged_total(&self.items)?,
            verified: true,
            overcharged: verification.has_overcharge,
        };
        // bill_id is filled in by the gateway
        let items = verification.to_new_bill_items(0);

        let (bill, items) = self
            .checker
            .gateway()
            .insert_bill_with_items(bill, items)
            .await
            .map_err(AuditError::from_save)?;

        info!(
            bill_id = bill.id,
            items = items.len(),
            unmatched = verification.unmatched.len(),
            overcharged = bill.overcharged,
            "Bill verification saved"
        );

        Ok(SavedBill {
            bill_id: bill.id,
            bill,
            items,
            verification,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryGateway;
    use fairbill_core::{ItemType, Money, NewCatalogItem};

    fn m(text: &str) -> Money {
        text.parse().unwrap()
    }

    fn line(name: &str, item_type: ItemType, price: &str) -> BillLineItem {
        BillLineItem::new(name, item_type, m(price))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    /// Catalog with exactly the two entries of the two-item scenario.
    async fn two_item_gateway() -> MemoryGateway {
        let gateway = MemoryGateway::new();
        gateway
            .add_catalog_item(
                ItemType::Medicine,
                NewCatalogItem::new("Paracetamol 500mg", "Pain Relief", 200, 500, Some("tablet")),
            )
            .await;
        gateway
            .add_catalog_item(
                ItemType::Medicine,
                NewCatalogItem::new("Metformin 500mg", "Diabetes", 300, 800, Some("tablet")),
            )
            .await;
        gateway
    }

    #[test]
    fn test_add_and_clear_items() {
        let mut verifier = BillVerifier::new(MemoryGateway::new());
        assert!(verifier.is_empty());

        verifier
            .add_item(line("  Paracetamol ", ItemType::Medicine, "3"))
            .unwrap();
        assert_eq!(verifier.len(), 1);
        assert_eq!(verifier.items()[0].name, "Paracetamol");

        assert!(verifier.add_item(line("", ItemType::Medicine, "3")).is_err());
        assert!(verifier
            .add_item(line("ECG", ItemType::Procedure, "-1"))
            .is_err());
        assert_eq!(verifier.len(), 1);

        verifier.clear_items();
        assert!(verifier.is_empty());
    }

    #[tokio::test]
    async fn test_two_item_bill() {
        let mut verifier = BillVerifier::new(two_item_gateway().await);
        verifier
            .add_item(line("Paracetamol", ItemType::Medicine, "3.00"))
            .unwrap();
        verifier
            .add_item(line("Metformin", ItemType::Medicine, "10.00"))
            .unwrap();

        let verification = verifier.verify_bill().await.unwrap();
        assert!(verification.has_overcharge);
        assert_eq!(verification.total_overcharge, m("2.00"));
        assert!(verification.items[0].is_valid);
        assert!(!verification.items[1].is_valid);

        let saved = verifier
            .save_bill("Asha Rao", "City Hospital", date())
            .await
            .unwrap();
        assert_eq!(saved.bill.total_amount, m("13.00"));
        assert!(saved.bill.overcharged);
        assert_eq!(saved.items.len(), 2);
        assert!(saved.items.iter().all(|item| item.bill_id == saved.bill_id));
    }

    #[tokio::test]
    async fn test_unmatched_lines_dropped_but_charged() {
        let mut verifier = BillVerifier::new(two_item_gateway().await);
        verifier
            .add_item(line("Nonexistent Drug", ItemType::Medicine, "50"))
            .unwrap();
        verifier
            .add_item(line("Paracetamol", ItemType::Medicine, "3"))
            .unwrap();

        let saved = verifier
            .save_bill("Asha Rao", "City Hospital", date())
            .await
            .unwrap();
        assert_eq!(saved.verification.items.len(), 1);
        assert_eq!(saved.verification.unmatched.len(), 1);
        assert!(!saved.bill.overcharged);
        assert_eq!(saved.bill.total_amount, m("53"));
        assert_eq!(saved.items.len(), 1);
    }

    #[tokio::test]
    async fn test_save_requires_items_and_header() {
        let verifier = BillVerifier::new(two_item_gateway().await);
        let err = verifier
            .save_bill("Asha Rao", "City Hospital", date())
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::Validation(_)));

        let mut verifier = verifier;
        verifier
            .add_item(line("Paracetamol", ItemType::Medicine, "3"))
            .unwrap();
        let err = verifier.save_bill("", "City Hospital", date()).await.unwrap_err();
        assert!(matches!(err, AuditError::Validation(_)));
    }

    #[tokio::test]
    async fn test_largest_prices_save_without_overflow() {
        use fairbill_core::validation::MAX_CHARGED_PRICE;

        let mut verifier = BillVerifier::new(two_item_gateway().await);
        for _ in 0..2 {
            let err = verifier
                .add_item(line("Paracetamol", ItemType::Medicine, "90000000000000000.00"))
                .unwrap_err();
            assert!(matches!(
                err,
                AuditError::Validation(ValidationError::OutOfRange { .. })
            ));
        }
        assert!(verifier.is_empty());

        for name in ["Paracetamol", "Metformin"] {
            verifier
                .add_item(BillLineItem::new(name, ItemType::Medicine, MAX_CHARGED_PRICE))
                .unwrap();
        }
        let saved = verifier
            .save_bill("Asha Rao", "City Hospital", date())
            .await
            .unwrap();
        assert_eq!(
            saved.bill.total_amount,
            Money::from_minor(MAX_CHARGED_PRICE.minor() * 2)
        );
        assert!(saved.bill.overcharged);
    }

    #[tokio::test]
    async fn test_bill_insert_failure() {
        let gateway = two_item_gateway().await;
        gateway.fail_bill_inserts(true).await;

        let mut verifier = BillVerifier::new(gateway.clone());
        verifier
            .add_item(line("Paracetamol", ItemType::Medicine, "3"))
            .unwrap();

        let err = verifier
            .save_bill("Asha Rao", "City Hospital", date())
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::BillNotSaved(_)));
        assert!(gateway.list_bills().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_item_insert_failure_is_surfaced() {
        let gateway = two_item_gateway().await;
        gateway.fail_item_inserts(true).await;

        let mut verifier = BillVerifier::new(gateway.clone());
        verifier
            .add_item(line("Paracetamol", ItemType::Medicine, "3"))
            .unwrap();

        let err = verifier
            .save_bill("Asha Rao", "City Hospital", date())
            .await
            .unwrap_err();
        let AuditError::ItemsNotSaved { bill_id, .. } = err else {
            panic!("expected ItemsNotSaved");
        };
        assert!(gateway.get_bill(bill_id).await.unwrap().is_some());
    }
}
