//! # Repository Module
//!
//! Database repository implementations for Fairbill.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Gateway impl (fairbill-audit)                                         │
//! │       │                                                                 │
//! │       │  db.catalog().search(ItemType::Medicine, "para", 10)           │
//! │       ▼                                                                 │
//! │  CatalogRepository      medicines, procedures   (read + seed)          │
//! │  BillRepository         bills, bill_items       (insert + read)        │
//! │  ComplaintRepository    complaints              (insert + read)        │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - Catalog listing, search, seeding
//! - [`BillRepository`](bill::BillRepository) - Bills and bill items
//! - [`ComplaintRepository`](complaint::ComplaintRepository) - Complaints

pub mod bill;
pub mod catalog;
pub mod complaint;
