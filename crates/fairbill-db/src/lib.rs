//! # fairbill-db: Database Layer for Fairbill
//!
//! This crate provides database access for Fairbill.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fairbill Data Flow                               │
//! │                                                                         │
//! │  fairbill-audit Gateway (impl for Database)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   fairbill-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ CatalogRepo   │    │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │◄───│ BillRepo      │    │ _schema.sql  │  │   │
//! │  │   │ Connection    │    │ ComplaintRepo │    │              │  │   │
//! │  │   │ Management    │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   medicines · procedures · bills · bill_items · complaints      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (catalog, bill, complaint)
//! - [`seed`] - Sample government catalog
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fairbill_core::ItemType;
//! use fairbill_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("fairbill.db")).await?;
//! db.catalog().seed_defaults().await?;
//!
//! let matches = db.catalog().search(ItemType::Medicine, "para", 10).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::bill::BillRepository;
pub use repository::catalog::CatalogRepository;
pub use repository::complaint::ComplaintRepository;
