//! # Store Operations
//!
//! Services combine repositories, pure domain logic from `storefront-core`
//! and transactions into the operations the HTTP layer calls.
//!
//! - [`InvoiceService`](invoice::InvoiceService) - create / get / list / update invoices
//! - [`CatalogService`](catalog::CatalogService) - product listing and management

pub mod catalog;
pub mod invoice;
