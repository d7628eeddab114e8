//! # Domain Types
//!
//! Core domain types used throughout Fairbill.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogItem    │   │      Bill       │   │   Complaint     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │◄┐ │  patient_name   │◄ ─│  bill_id?       │       │
//! │  │  govt_min_price │ │ │  total_amount   │   │  overcharge_amt │       │
//! │  │  govt_max_price │ │ │  overcharged    │   │  status         │       │
//! │  └─────────────────┘ │ └────────▲────────┘   └─────────────────┘       │
//! │                      │          │ bill_id (FK)                          │
//! │                      │ ┌────────┴────────┐   ┌─────────────────┐       │
//! │                      └─│    BillItem     │   │  BillLineItem   │       │
//! │               item_id  │  charged_price  │   │  (input only)   │       │
//! │                        │  is_overcharged │   │  name, type,    │       │
//! │                        └─────────────────┘   │  price          │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records come in pairs: `Bill` is what the database returns, `NewBill` is
//! what callers hand to an insert. The dashed link from `Complaint` to `Bill`
//! is not enforced by a foreign key.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Item Type
// =============================================================================

/// Which government catalog an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// A medicine from the `medicines` table.
    Medicine,
    /// A procedure from the `procedures` table.
    Procedure,
}

impl ItemType {
    /// Name of the catalog table holding this type.
    pub const fn table_name(&self) -> &'static str {
        match self {
            ItemType::Medicine => "medicines",
            ItemType::Procedure => "procedures",
        }
    }

    /// Lowercase label, as stored in `bill_items.item_type`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ItemType::Medicine => "medicine",
            ItemType::Procedure => "procedure",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "medicine" | "medicines" => Ok(ItemType::Medicine),
            "procedure" | "procedures" => Ok(ItemType::Procedure),
            other => Err(CoreError::UnknownItemType(other.to_string())),
        }
    }
}

// =============================================================================
// Catalog Item
// =============================================================================

/// A government-priced medicine or procedure.
///
/// Immutable reference data; `govt_min_price <= govt_max_price` always holds
/// for rows inserted through the repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    /// Dispensing unit ("tablet", "capsule"). Always `None` for procedures.
    pub unit: Option<String>,
    /// Lowest allowed price, in minor units.
    pub govt_min_price: Money,
    /// Highest allowed price, in minor units.
    pub govt_max_price: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl CatalogItem {
    /// Case-insensitive partial name match with Unicode case folding.
    ///
    /// Both gateways search through this, so "ácido" finds "Ácido Fólico"
    /// on SQLite as well.
    pub fn name_matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        self.name.to_lowercase().contains(&needle)
    }
}

/// Insert payload for a catalog row (seeding and admin tooling).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCatalogItem {
    pub name: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub govt_min_price: Money,
    pub govt_max_price: Money,
}

impl NewCatalogItem {
    /// Convenience constructor used by seed data.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        min_minor: i64,
        max_minor: i64,
        unit: Option<&str>,
    ) -> Self {
        NewCatalogItem {
            name: name.into(),
            category: Some(category.into()),
            unit: unit.map(str::to_string),
            govt_min_price: Money::from_minor(min_minor),
            govt_max_price: Money::from_minor(max_minor),
        }
    }
}

// =============================================================================
// Bill Line Item (input)
// =============================================================================

/// One charge as written on the hospital bill, before verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillLineItem {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Charged price, in minor units.
    pub price: Money,
}

impl BillLineItem {
    pub fn new(name: impl Into<String>, item_type: ItemType, price: Money) -> Self {
        BillLineItem {
            name: name.into(),
            item_type,
            price,
        }
    }
}

// =============================================================================
// Bill
// =============================================================================

/// A persisted bill. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Bill {
    pub id: i64,
    pub patient_name: String,
    pub hospital_name: String,
    #[ts(as = "String")]
    pub bill_date: NaiveDate,
    /// Sum of every charged price on the bill, matched or not.
    pub total_amount: Money,
    pub verified: bool,
    pub overcharged: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBill {
    pub patient_name: String,
    pub hospital_name: String,
    pub bill_date: NaiveDate,
    pub total_amount: Money,
    pub verified: bool,
    pub overcharged: bool,
}

impl NewBill {
    /// Builds the synthetic bill recorded for a single-item quick check.
    pub fn quick_check(bill_date: NaiveDate, charged: Money, is_valid: bool) -> Self {
        NewBill {
            patient_name: crate::QUICK_CHECK_PATIENT.to_string(),
            hospital_name: crate::QUICK_CHECK_HOSPITAL.to_string(),
            bill_date,
            total_amount: charged,
            verified: true,
            overcharged: !is_valid,
        }
    }

    /// Materializes the stored record once the backend has assigned an id.
    pub fn into_bill(self, id: i64, created_at: DateTime<Utc>) -> Bill {
        Bill {
            id,
            patient_name: self.patient_name,
            hospital_name: self.hospital_name,
            bill_date: self.bill_date,
            total_amount: self.total_amount,
            verified: self.verified,
            overcharged: self.overcharged,
            created_at,
        }
    }
}

impl Bill {
    /// Whether this row came from a quick check rather than a patient bill.
    pub fn is_quick_check(&self) -> bool {
        self.patient_name == crate::QUICK_CHECK_PATIENT
            && self.hospital_name == crate::QUICK_CHECK_HOSPITAL
    }
}

// =============================================================================
// Bill Item
// =============================================================================

/// One verified line of a persisted bill.
///
/// Uses the snapshot pattern: name and ceiling are copied from the catalog
/// at verification time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BillItem {
    pub id: i64,
    pub bill_id: i64,
    pub item_type: ItemType,
    /// Catalog row id in `medicines` or `procedures`.
    pub item_id: i64,
    /// Catalog name at time of verification (frozen).
    pub item_name: String,
    pub charged_price: Money,
    /// Catalog ceiling at time of verification (frozen).
    pub govt_max_price: Money,
    pub is_overcharged: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a bill item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBillItem {
    pub bill_id: i64,
    pub item_type: ItemType,
    pub item_id: i64,
    pub item_name: String,
    pub charged_price: Money,
    pub govt_max_price: Money,
    pub is_overcharged: bool,
}

impl NewBillItem {
    pub fn into_bill_item(self, id: i64, created_at: DateTime<Utc>) -> BillItem {
        BillItem {
            id,
            bill_id: self.bill_id,
            item_type: self.item_type,
            item_id: self.item_id,
            item_name: self.item_name,
            charged_price: self.charged_price,
            govt_max_price: self.govt_max_price,
            is_overcharged: self.is_overcharged,
            created_at,
        }
    }
}

/// A bill together with its verified items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillDetails {
    pub bill: Bill,
    pub items: Vec<BillItem>,
}

// =============================================================================
// Complaint
// =============================================================================

/// A complaint filed by a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Complaint {
    pub id: i64,
    /// Optional link to a bill; not enforced by the schema.
    pub bill_id: Option<i64>,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub hospital_name: String,
    pub complaint_details: String,
    pub overcharge_amount: Money,
    pub status: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a complaint. Status is always assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComplaint {
    pub bill_id: Option<i64>,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub hospital_name: String,
    pub complaint_details: String,
    pub overcharge_amount: Money,
}

impl NewComplaint {
    pub fn into_complaint(self, id: i64, created_at: DateTime<Utc>) -> Complaint {
        Complaint {
            id,
            bill_id: self.bill_id,
            patient_name: self.patient_name,
            patient_email: self.patient_email,
            patient_phone: self.patient_phone,
            hospital_name: self.hospital_name,
            complaint_details: self.complaint_details,
            overcharge_amount: self.overcharge_amount,
            status: crate::DEFAULT_COMPLAINT_STATUS.to_string(),
            created_at,
        }
    }
}

// =============================================================================
// Dashboard Stats
// =============================================================================

/// Counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    pub total_bills: i64,
    pub overcharged_bills: i64,
    pub valid_bills: i64,
    pub total_complaints: i64,
}

impl DashboardStats {
    /// Derives the counts from downloaded rows.
    pub fn from_records(bills: &[Bill], complaints: &[Complaint]) -> Self {
        let total = bills.len() as i64;
        let overcharged = bills.iter().filter(|b| b.overcharged).count() as i64;
        DashboardStats::from_counts(total, overcharged, complaints.len() as i64)
    }

    /// Builds stats from precomputed counts.
    pub fn from_counts(total_bills: i64, overcharged_bills: i64, total_complaints: i64) -> Self {
        DashboardStats {
            total_bills,
            overcharged_bills,
            valid_bills: total_bills - overcharged_bills,
            total_complaints,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bill(id: i64, overcharged: bool) -> Bill {
        NewBill {
            patient_name: "Asha".to_string(),
            hospital_name: "City Hospital".to_string(),
            bill_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            total_amount: Money::from_minor(1300),
            verified: true,
            overcharged,
        }
        .into_bill(id, Utc::now())
    }

    #[test]
    fn test_item_type_parsing() {
        assert_eq!("medicine".parse::<ItemType>().unwrap(), ItemType::Medicine);
        assert_eq!("Procedure".parse::<ItemType>().unwrap(), ItemType::Procedure);
        assert_eq!("procedures".parse::<ItemType>().unwrap(), ItemType::Procedure);
        assert!("device".parse::<ItemType>().is_err());
    }

    #[test]
    fn test_item_type_tables() {
        assert_eq!(ItemType::Medicine.table_name(), "medicines");
        assert_eq!(ItemType::Procedure.table_name(), "procedures");
        assert_eq!(ItemType::Procedure.to_string(), "procedure");
    }

    #[test]
    fn test_line_item_serializes_type_field() {
        let line = BillLineItem::new("ECG", ItemType::Procedure, Money::from_minor(35000));
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["type"], "procedure");
        assert_eq!(json["price"], 35000);
    }

    #[test]
    fn test_quick_check_bill() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let new_bill = NewBill::quick_check(date, Money::from_minor(750), false);
        assert!(new_bill.overcharged);
        assert!(new_bill.verified);

        let stored = new_bill.into_bill(7, Utc::now());
        assert!(stored.is_quick_check());
        assert!(!bill(1, false).is_quick_check());
    }

    #[test]
    fn test_name_matches_folds_unicode_case() {
        let item = CatalogItem {
            id: 1,
            name: "Ácido Fólico 5mg".to_string(),
            category: None,
            unit: None,
            govt_min_price: Money::from_minor(100),
            govt_max_price: Money::from_minor(300),
            created_at: Utc::now(),
        };

        assert!(item.name_matches("ácido"));
        assert!(item.name_matches(" FÓLICO "));
        assert!(item.name_matches("5MG"));
        assert!(!item.name_matches("acido"));
        assert!(!item.name_matches("%"));
    }

    #[test]
    fn test_stats_from_records() {
        let bills = vec![bill(1, true), bill(2, false), bill(3, true)];
        let stats = DashboardStats::from_records(&bills, &[]);
        assert_eq!(stats.total_bills, 3);
        assert_eq!(stats.overcharged_bills, 2);
        assert_eq!(stats.valid_bills, 1);
        assert_eq!(stats.total_complaints, 0);
    }
}
