//! # fairbill-audit: Price Checking and Bill Verification
//!
//! Orchestrates catalog lookups, ceiling assessment and persistence of
//! results. All storage access goes through the [`Gateway`] trait.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    fairbill CLI (apps/cli)                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               fairbill-audit (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   PriceChecker ──┐                       render                 │   │
//! │  │   BillVerifier ──┼──► dyn Gateway        (HTML + text)          │   │
//! │  │   file_complaint ┘      │                                       │   │
//! │  │                         ├── Database (SQLite)                   │   │
//! │  │                         └── MemoryGateway (tests)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │          fairbill-core (rules) · fairbill-db (SQLite)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fairbill_audit::{BillVerifier, PriceChecker};
//! use fairbill_core::{BillLineItem, ItemType};
//!
//! let checker = PriceChecker::new(db.clone());
//! let outcome = checker
//!     .check_price("paracetamol", ItemType::Medicine, "7.50".parse()?, false)
//!     .await?;
//!
//! let mut verifier = BillVerifier::new(db);
//! verifier.add_item(BillLineItem::new("Paracetamol", ItemType::Medicine, "3".parse()?))?;
//! let saved = verifier.save_bill("Asha Rao", "City Hospital", today).await?;
//! ```

pub mod checker;
pub mod complaint;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod render;
pub mod verifier;

pub use checker::{PriceCheck, PriceCheckOutcome, PriceChecker};
pub use complaint::{file_complaint, validate_complaint};
pub use error::{AuditError, AuditResult, GatewayError, GatewayResult};
pub use gateway::Gateway;
pub use memory::MemoryGateway;
pub use verifier::{BillVerifier, SavedBill};
