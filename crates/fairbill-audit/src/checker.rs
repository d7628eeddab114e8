//! # Price Checker
//!
//! Looks up one named item in the government catalog and judges the
//! charged price against its ceiling.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  check_price("paracetamol", Medicine, ₹7.50, persist)                  │
//! │       │                                                                 │
//! │       ├── validate name + price ──────────────► AuditError::Validation │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  gateway.search_catalog(Medicine, "paracetamol", 10)                   │
//! │       │                                                                 │
//! │       ├── error ──► warn!, treated as no match                         │
//! │       ├── [] ─────► PriceCheck::NotFound  (nothing persisted)          │
//! │       │                                                                 │
//! │       ▼ first match                                                    │
//! │  PriceAssessment::assess  (fairbill-core)                              │
//! │       │                                                                 │
//! │       ▼ persist?                                                       │
//! │  gateway.insert_bill(NewBill::quick_check(..))                         │
//! │       ├── Ok  ──► saved_bill_id                                        │
//! │       └── Err ──► warn!, save_error (the check itself still stands)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use fairbill_core::validation::{validate_charged_price, validate_item_name};
use fairbill_core::verification::NOT_FOUND_MESSAGE;
use fairbill_core::{CatalogItem, CurrencyFormat, ItemType, Money, NewBill, PriceAssessment};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::AuditResult;
use crate::gateway::Gateway;

// =============================================================================
// Result Types
// =============================================================================

/// Verdict for a single item lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PriceCheck {
    /// No catalog entry matched the name. Not an error.
    NotFound { message: String },
    /// A catalog entry matched and the price was assessed.
    Found(PriceAssessment),
}

impl PriceCheck {
    pub fn is_found(&self) -> bool {
        matches!(self, PriceCheck::Found(_))
    }

    pub fn message(&self) -> &str {
        match self {
            PriceCheck::NotFound { message } => message,
            PriceCheck::Found(assessment) => &assessment.message,
        }
    }

    pub fn assessment(&self) -> Option<&PriceAssessment> {
        match self {
            PriceCheck::Found(assessment) => Some(assessment),
            PriceCheck::NotFound { .. } => None,
        }
    }
}

/// A price check plus the outcome of recording it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceCheckOutcome {
    pub check: PriceCheck,
    /// Id of the quick-check bill, when one was written.
    pub saved_bill_id: Option<i64>,
    /// Why the quick-check bill could not be written.
    pub save_error: Option<String>,
}

// =============================================================================
// Price Checker
// =============================================================================

/// Single-item lookups against a [`Gateway`].
#[derive(Debug, Clone)]
pub struct PriceChecker<G> {
    gateway: G,
    format: CurrencyFormat,
}

impl<G: Gateway> PriceChecker<G> {
    /// Creates a checker formatting amounts with the default symbol.
    pub fn new(gateway: G) -> Self {
        PriceChecker {
            gateway,
            format: CurrencyFormat::default(),
        }
    }

    /// Replaces the currency format used in messages.
    pub fn with_format(mut self, format: CurrencyFormat) -> Self {
        self.format = format;
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn format(&self) -> &CurrencyFormat {
        &self.format
    }

    /// First catalog match for `name`, if any.
    ///
    /// A failing search is logged and reported as no match.
    pub async fn lookup(&self, item_type: ItemType, name: &str) -> Option<CatalogItem> {
        match self
            .gateway
            .search_catalog(item_type, name, fairbill_core::SEARCH_LIMIT)
            .await
        {
            Ok(matches) => matches.into_iter().next(),
            Err(err) => {
                warn!(item = %name, item_type = %item_type, error = %err, "Catalog search failed");
                None
            }
        }
    }

    /// Looks up and assesses a charge without writing anything.
    pub async fn assess(
        &self,
        item_type: ItemType,
        name: &str,
        charged: Money,
    ) -> Option<PriceAssessment> {
        let item = self.lookup(item_type, name).await?;
        Some(PriceAssessment::assess(item, charged, &self.format))
    }

    /// Checks one charged price, optionally recording a quick-check bill
    /// dated today.
    pub async fn check_price(
        &self,
        name: &str,
        item_type: ItemType,
        charged: Money,
        persist: bool,
    ) -> AuditResult<PriceCheckOutcome> {
        self.check_price_on(name, item_type, charged, persist, Utc::now().date_naive())
            .await
    }

    /// As [`check_price`](Self::check_price), with an explicit bill date.
    pub async fn check_price_on(
        &self,
        name: &str,
        item_type: ItemType,
        charged: Money,
        persist: bool,
        bill_date: NaiveDate,
    ) -> AuditResult<PriceCheckOutcome> {
        let name = validate_item_name(name)?;
        validate_charged_price(charged)?;

        debug!(item = %name, item_type = %item_type, charged = %charged, persist, "Checking price");

        let Some(assessment) = self.assess(item_type, &name, charged).await else {
            return Ok(PriceCheckOutcome {
                check: PriceCheck::NotFound {
                    message: NOT_FOUND_MESSAGE.to_string(),
                },
                saved_bill_id: None,
                save_error: None,
            });
        };

        let mut outcome = PriceCheckOutcome {
            saved_bill_id: None,
            save_error: None,
            check: PriceCheck::Found(assessment),
        };

        if persist {
            let is_valid = outcome.check.assessment().is_some_and(|a| a.is_valid);
            let bill = NewBill::quick_check(bill_date, charged, is_valid);

            match self.gateway.insert_bill(bill).await {
                Ok(saved) => {
                    info!(bill_id = saved.id, overcharged = saved.overcharged, "Quick check recorded");
                    outcome.saved_bill_id = Some(saved.id);
                }
                Err(err) => {
                    warn!(error = %err, "Failed to record quick check");
                    outcome.save_error = Some(err.to_string());
                }
            }
        }

        Ok(outcome)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryGateway;
    use crate::AuditError;

    async fn checker() -> PriceChecker<MemoryGateway> {
        PriceChecker::new(MemoryGateway::with_sample_catalog().await)
    }

    fn rupees(text: &str) -> Money {
        text.parse().unwrap()
    }

    #[tokio::test]
    async fn test_price_within_limits() {
        let checker = checker().await;
        let outcome = checker
            .check_price("Paracetamol 500mg", ItemType::Medicine, rupees("3.00"), false)
            .await
            .unwrap();

        let assessment = outcome.check.assessment().unwrap();
        assert!(assessment.is_valid);
        assert!(assessment.overcharge.is_zero());
        assert_eq!(outcome.check.message(), "Price is within government limits");
        assert_eq!(outcome.saved_bill_id, None);
    }

    #[tokio::test]
    async fn test_overcharged_price() {
        let checker = checker().await;
        let outcome = checker
            .check_price("Paracetamol 500mg", ItemType::Medicine, rupees("7.50"), false)
            .await
            .unwrap();

        let assessment = outcome.check.assessment().unwrap();
        assert!(!assessment.is_valid);
        assert_eq!(assessment.overcharge, rupees("2.50"));
        assert_eq!(outcome.check.message(), "Overcharged by ₹2.50");
    }

    #[tokio::test]
    async fn test_partial_name_takes_first_match() {
        let checker = checker().await;
        let item = checker.lookup(ItemType::Medicine, "mg").await.unwrap();
        assert_eq!(item.name, "Paracetamol 500mg");
    }

    #[tokio::test]
    async fn test_not_found_never_persists() {
        let checker = checker().await;
        let outcome = checker
            .check_price("Nonexistent Drug", ItemType::Medicine, rupees("10"), true)
            .await
            .unwrap();

        assert!(!outcome.check.is_found());
        assert_eq!(outcome.check.message(), "Item not found in government database");
        assert_eq!(outcome.saved_bill_id, None);
        assert!(checker.gateway().list_bills().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persist_records_quick_check_bill() {
        let checker = checker().await;
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let outcome = checker
            .check_price_on("ECG", ItemType::Procedure, rupees("450"), true, date)
            .await
            .unwrap();

        let bill_id = outcome.saved_bill_id.unwrap();
        let bill = checker.gateway().get_bill(bill_id).await.unwrap().unwrap();
        assert!(bill.is_quick_check());
        assert_eq!(bill.patient_name, "Quick Check");
        assert_eq!(bill.hospital_name, "Price Verification");
        assert_eq!(bill.bill_date, date);
        assert_eq!(bill.total_amount, rupees("450"));
        assert!(bill.verified);
        assert!(bill.overcharged);
    }

    #[tokio::test]
    async fn test_search_failure_reads_as_not_found() {
        let checker = checker().await;
        checker.gateway().fail_searches(true).await;

        let outcome = checker
            .check_price("Paracetamol", ItemType::Medicine, rupees("3"), true)
            .await
            .unwrap();
        assert!(!outcome.check.is_found());
        assert!(checker.gateway().list_bills().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_quick_check_save_is_reported() {
        let checker = checker().await;
        checker.gateway().fail_bill_inserts(true).await;

        let outcome = checker
            .check_price("Paracetamol", ItemType::Medicine, rupees("3"), true)
            .await
            .unwrap();
        assert!(outcome.check.is_found());
        assert_eq!(outcome.saved_bill_id, None);
        assert!(outcome.save_error.unwrap().contains("injected"));
    }

    #[tokio::test]
    async fn test_invalid_input_rejected() {
        let checker = checker().await;

        let err = checker
            .check_price("  ", ItemType::Medicine, rupees("3"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::Validation(_)));

        let err = checker
            .check_price("Paracetamol", ItemType::Medicine, rupees("-3"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::Validation(_)));
    }

    #[test]
    fn test_check_serializes_with_tag() {
        let check = PriceCheck::NotFound {
            message: NOT_FOUND_MESSAGE.to_string(),
        };
        let json = serde_json::to_value(&check).unwrap();
        assert_eq!(json["result"], "not_found");
    }
}
