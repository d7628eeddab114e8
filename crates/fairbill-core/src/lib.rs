//! # fairbill-core: Pure Business Logic for Fairbill
//!
//! This crate holds the rules that decide whether a hospital charge is
//! within the government price ceiling. Everything here is a pure function
//! over plain data.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fairbill Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    fairbill CLI / web front end                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              fairbill-audit (PriceChecker, BillVerifier)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fairbill-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │verification│  │ validation│  │   │
//! │  │   │ Catalog   │  │   Money   │  │ Assessment │  │   rules   │  │   │
//! │  │   │ Bill      │  │ Currency  │  │ BillVerif. │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    fairbill-db (Database Layer)                 │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CatalogItem, Bill, BillItem, Complaint, etc.)
//! - [`money`] - Money type with integer arithmetic and currency formatting
//! - [`error`] - Domain error types
//! - [`validation`] - Price ceiling rules and input validation
//! - [`verification`] - Per-item assessment and bill aggregation
//!
//! ## Example Usage
//!
//! ```rust
//! use fairbill_core::money::{CurrencyFormat, Money};
//! use fairbill_core::validation::{is_price_valid, overcharge_amount};
//!
//! let charged: Money = "7.50".parse().unwrap();
//! let min = Money::from_minor(200);
//! let max = Money::from_minor(500);
//!
//! assert!(!is_price_valid(charged, min, max));
//! let overcharge = overcharge_amount(charged, max);
//! assert_eq!(CurrencyFormat::default().format(overcharge), "₹2.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;
pub mod verification;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::{CurrencyFormat, Money};
pub use types::*;
pub use verification::{BillVerification, PriceAssessment, VerifiedLineItem};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum catalog matches fetched per lookup.
///
/// The first match wins; the rest only matter for search listings.
pub const SEARCH_LIMIT: u32 = 10;

/// Maximum line items accepted in a single bill.
pub const MAX_BILL_ITEMS: usize = 200;

/// Patient name recorded on quick-check bills.
pub const QUICK_CHECK_PATIENT: &str = "Quick Check";

/// Hospital name recorded on quick-check bills.
pub const QUICK_CHECK_HOSPITAL: &str = "Price Verification";

/// Status given to newly filed complaints.
pub const DEFAULT_COMPLAINT_STATUS: &str = "Pending";
