//! # Repository Module
//!
//! Database repository implementations for the storefront back-office.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler / service                                                 │
//! │       │                                                                 │
//! │       │  db.products().get_active(3)                                    │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── list_active(&self, page, page_size)                                │
//! │  ├── get_active(&self, id)                                              │
//! │  ├── insert(&self, input)                                               │
//! │  └── update(&self, input)                                               │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Accounts for authentication
//! - [`ProductRepository`](product::ProductRepository) - Catalog CRUD + soft delete
//! - [`InvoiceRepository`](invoice::InvoiceRepository) - Invoice and line item rows

pub mod invoice;
pub mod product;
pub mod user;
