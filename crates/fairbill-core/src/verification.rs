//! # Verification Module
//!
//! Per-item price assessment and whole-bill aggregation.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BillLineItem ──► catalog lookup (fairbill-audit) ──► CatalogItem?      │
//! │                                                          │              │
//! │                     ┌────────────────────────────────────┤              │
//! │                     │ None                               │ Some         │
//! │                     ▼                                    ▼              │
//! │               unmatched list              PriceAssessment::assess       │
//! │                     │                                    │              │
//! │                     │                                    ▼              │
//! │                     │                           VerifiedLineItem        │
//! │                     │                                    │              │
//! │                     └──────────────┬─────────────────────┘              │
//! │                                    ▼                                    │
//! │                          BillVerification::collect                      │
//! │                   (input order kept, totals over matched only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unmatched lines never appear in `items` and never count toward
//! `total_overcharge`. They are still part of the charged total of a saved
//! bill (see [`charged_total`]).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{CurrencyFormat, Money};
use crate::types::{BillLineItem, CatalogItem, NewBillItem};
use crate::validation::{is_price_valid, overcharge_amount, ValidationResult};

/// Message for a lookup with no catalog match.
pub const NOT_FOUND_MESSAGE: &str = "Item not found in government database";

/// Message for a price inside the allowed range.
pub const WITHIN_LIMITS_MESSAGE: &str = "Price is within government limits";

/// Message for a price under the allowed minimum.
pub const BELOW_MINIMUM_MESSAGE: &str = "Price is below government minimum";

// =============================================================================
// Price Assessment
// =============================================================================

/// Outcome of comparing one charged price against its catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceAssessment {
    pub catalog_item: CatalogItem,
    pub charged_price: Money,
    pub is_valid: bool,
    /// Always `>= 0`; zero unless the charge exceeds the ceiling.
    pub overcharge: Money,
    pub message: String,
}

impl PriceAssessment {
    /// Applies the ceiling rules to a charged price.
    ///
    /// ```rust
    /// use chrono::Utc;
    /// use fairbill_core::{CatalogItem, CurrencyFormat, Money, PriceAssessment};
    ///
    /// let item = CatalogItem {
    ///     id: 1,
    ///     name: "Paracetamol 500mg".to_string(),
    ///     category: Some("Pain Relief".to_string()),
    ///     unit: Some("tablet".to_string()),
    ///     govt_min_price: Money::from_minor(200),
    ///     govt_max_price: Money::from_minor(500),
    ///     created_at: Utc::now(),
    /// };
    ///
    /// let a = PriceAssessment::assess(item, Money::from_minor(750), &CurrencyFormat::default());
    /// assert!(!a.is_valid);
    /// assert_eq!(a.message, "Overcharged by ₹2.50");
    /// ```
    pub fn assess(catalog_item: CatalogItem, charged: Money, format: &CurrencyFormat) -> Self {
        let is_valid = is_price_valid(
            charged,
            catalog_item.govt_min_price,
            catalog_item.govt_max_price,
        );
        let overcharge = overcharge_amount(charged, catalog_item.govt_max_price);

        let message = if is_valid {
            WITHIN_LIMITS_MESSAGE.to_string()
        } else if overcharge.is_positive() {
            format!("Overcharged by {}", format.format(overcharge))
        } else {
            BELOW_MINIMUM_MESSAGE.to_string()
        };

        PriceAssessment {
            catalog_item,
            charged_price: charged,
            is_valid,
            overcharge,
            message,
        }
    }

    /// True when the charge is under the catalog minimum.
    pub fn is_below_minimum(&self) -> bool {
        self.charged_price < self.catalog_item.govt_min_price
    }
}

// =============================================================================
// Verified Line Item
// =============================================================================

/// A bill line that matched a catalog entry, with its verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VerifiedLineItem {
    pub line: BillLineItem,
    pub catalog_item: CatalogItem,
    pub is_valid: bool,
    pub overcharge: Money,
    pub message: String,
}

impl VerifiedLineItem {
    pub fn new(line: BillLineItem, assessment: PriceAssessment) -> Self {
        VerifiedLineItem {
            line,
            catalog_item: assessment.catalog_item,
            is_valid: assessment.is_valid,
            overcharge: assessment.overcharge,
            message: assessment.message,
        }
    }

    /// Row to persist for this line once the bill id is known.
    ///
    /// Name and ceiling are snapshotted from the catalog entry.
    pub fn to_new_bill_item(&self, bill_id: i64) -> NewBillItem {
        NewBillItem {
            bill_id,
            item_type: self.line.item_type,
            item_id: self.catalog_item.id,
            item_name: self.catalog_item.name.clone(),
            charged_price: self.line.price,
            govt_max_price: self.catalog_item.govt_max_price,
            is_overcharged: !self.is_valid,
        }
    }
}

// =============================================================================
// Bill Verification
// =============================================================================

/// Aggregate result of verifying every line of a bill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillVerification {
    /// Matched lines in input order.
    pub items: Vec<VerifiedLineItem>,
    /// Lines with no catalog match, in input order.
    pub unmatched: Vec<BillLineItem>,
    pub total_overcharge: Money,
    pub has_overcharge: bool,
    pub verified: bool,
}

impl BillVerification {
    /// Folds per-line lookup results into a verification.
    ///
    /// Each entry pairs an input line with its assessment, or `None` when the
    /// catalog had no match.
    ///
    /// ## Errors
    /// `ValidationError::OutOfRange` when the overcharge total does not fit.
    pub fn collect<I>(results: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = (BillLineItem, Option<PriceAssessment>)>,
    {
        let mut verification = BillVerification {
            verified: true,
            ..Default::default()
        };

        for (line, assessment) in results {
            match assessment {
                Some(assessment) => {
                    verification.total_overcharge = verification
                        .total_overcharge
                        .checked_add(assessment.overcharge)
                        .ok_or_else(|| total_overflow("total overcharge"))?;
                    verification.has_overcharge |= !assessment.is_valid;
                    verification.items.push(VerifiedLineItem::new(line, assessment));
                }
                None => verification.unmatched.push(line),
            }
        }

        Ok(verification)
    }

    /// Number of matched lines that failed the ceiling rules.
    pub fn invalid_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_valid).count()
    }

    /// Bill item rows for every matched line.
    pub fn to_new_bill_items(&self, bill_id: i64) -> Vec<NewBillItem> {
        self.items
            .iter()
            .map(|item| item.to_new_bill_item(bill_id))
            .collect()
    }
}

/// Sum of the charged prices of every line, matched or not.
pub fn charged_total(lines: &[BillLineItem]) -> ValidationResult<Money> {
    lines.iter().try_fold(Money::zero(), |total, line| {
        total
            .checked_add(line.price)
            .ok_or_else(|| total_overflow("bill total"))
    })
}

fn total_overflow(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
