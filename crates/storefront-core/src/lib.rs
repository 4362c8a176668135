//! # storefront-core: Pure Business Logic for the Storefront Back-Office
//!
//! This crate is the **heart** of the back-office. It contains the invoice
//! pricing rules, the access policy and all validation as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (storefront-api)                    │   │
//! │  │    auth ──► products ──► invoices                               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        storefront-db (store operations, repositories)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ storefront-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │  policy   │  │   │
//! │  │   │  Product  │  │   Money   │  │  Pricer   │  │  can_view │  │   │
//! │  │   │  Invoice  │  │  Decimal  │  │ Aggregate │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Invoice, LineItem, Role, Caller)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Line-item pricer and invoice aggregator
//! - [`policy`] - Invoice access policy
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::money::Money;
//!
//! let unit_price = Money::from_cents(10_000); // 100.00
//! let subtotal = unit_price.checked_mul_quantity(2).unwrap();
//! assert_eq!(subtotal.to_string(), "200.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod policy;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{CatalogEntry, CatalogLookup, LineRequest};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single product on one invoice line.
pub const MAX_LINE_QUANTITY: i64 = 10_000;

/// Maximum unit price in minor units (999,999.99).
pub const MAX_UNIT_PRICE_CENTS: i64 = 99_999_999;

/// Largest amount representable with 18 total digits and 2 decimal places,
/// in minor units. Money fields are persisted at this precision.
pub const MAX_AMOUNT_CENTS: i64 = 999_999_999_999_999_999;

/// Maximum length of a product display name (per language).
pub const MAX_PRODUCT_NAME_LENGTH: usize = 200;
