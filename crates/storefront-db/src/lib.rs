//! # storefront-db: Database Layer for the Storefront Back-Office
//!
//! This crate provides database access and the invoice/catalog store
//! operations. It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Data Flow                             │
//! │                                                                         │
//! │  HTTP handler (POST /api/invoices/create)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  storefront-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌───────────────┐    │   │
//! │  │   │   Services    │   │ Repositories  │   │   Database    │    │   │
//! │  │   │ (service/)    │──►│ (repository/) │──►│   (pool.rs)   │    │   │
//! │  │   │               │   │               │   │               │    │   │
//! │  │   │ InvoiceService│   │ InvoiceRepo   │   │ SqlitePool    │    │   │
//! │  │   │ CatalogService│   │ ProductRepo   │   │ Migrations    │    │   │
//! │  │   │               │   │ UserRepo      │   │               │    │   │
//! │  │   └───────┬───────┘   └───────────────┘   └───────────────┘    │   │
//! │  │           │ pricing, validation, policy                         │   │
//! │  │           ▼                                                     │   │
//! │  │     storefront-core                                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (./storefront.db)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and service error types
//! - [`repository`] - Repository implementations (user, product, invoice)
//! - [`service`] - Invoice store operations and catalog management
//! - [`seed`] - Demo data
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::{Database, DbConfig, InvoiceService};
//!
//! let db = Database::new(DbConfig::new("./storefront.db")).await?;
//!
//! let invoices = InvoiceService::new(db.clone());
//! let invoice = invoices.create(owner_id, &lines).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, ServiceError, ServiceResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::invoice::InvoiceRepository;
pub use repository::product::ProductRepository;
pub use repository::user::{NewUser, UserRepository};

pub use service::catalog::CatalogService;
pub use service::invoice::InvoiceService;
