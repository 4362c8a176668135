//! # Domain Types
//!
//! Core domain types for the storefront back-office.
//!
//! ## Entity Relationship Diagram
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Domain Model                                      │
//! │                                                                         │
//! │  ┌──────────────┐         ┌──────────────┐         ┌──────────────┐    │
//! │  │    User      │ 1     * │   Invoice    │ 1     * │  LineItem    │    │
//! │  │──────────────│────────►│──────────────│────────►│──────────────│    │
//! │  │ id           │  owns   │ id           │         │ id           │    │
//! │  │ username     │         │ user_id      │         │ invoice_id   │    │
//! │  │ role         │         │ created_at   │         │ product_id ──┼─┐  │
//! │  │ password_hash│         │ total_cents  │         │ price_cents  │ │  │
//! │  └──────────────┘         │ version      │         │ quantity     │ │  │
//! │                           └──────────────┘         └──────────────┘ │  │
//! │                                                                     │  │
//! │  ┌──────────────┐                                                   │  │
//! │  │   Product    │◄──────────────────────────────────────────────────┘  │
//! │  │──────────────│   price is copied into LineItem.price_cents           │
//! │  │ english_name │   at pricing time and never refreshed                 │
//! │  │ arabic_name  │                                                       │
//! │  │ price_cents  │                                                       │
//! │  │ is_deleted   │   (soft delete)                                       │
//! │  └──────────────┘                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Money Fields
//! Persisted structs carry `*_cents: i64` columns directly and expose
//! [`Money`] accessors, so rows map 1:1 onto the SQLite schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money::Money;

// =============================================================================
// Role & Caller
// =============================================================================

/// Authorization role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum Role {
    /// Back-office staff: full catalog and invoice access.
    Admin,
    /// Customer: creates invoices and reads their own.
    Visitor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Visitor => "Visitor",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Visitor
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "visitor" => Ok(Role::Visitor),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// An already-authenticated identity, as handed to store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: i64,
    pub role: Role,
}

impl Caller {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub username: String,

    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Registration input as received from a client, before hashing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,

    /// Display name shown on invoices.
    pub english_name: String,

    pub arabic_name: String,

    /// Current unit price in cents. Invoices snapshot this value.
    pub price_cents: i64,

    /// Soft delete flag. Deleted products drop out of listings but still
    /// resolve by id for historical invoices.
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Input for catalog create-or-update.
///
/// `id <= 0` (or an id that does not resolve to an active product) means
/// "create".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub id: i64,
    pub english_name: String,
    pub arabic_name: String,
    pub price: Money,
}

/// Tagged result of an upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert<T> {
    Created(T),
    Updated(T),
}

impl<T> Upsert<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Upsert::Created(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Upsert::Created(value) | Upsert::Updated(value) => value,
        }
    }
}

/// One page of a listing plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: i64,
    pub page: i64,
    pub page_size: i64,
}

// =============================================================================
// Invoice
// =============================================================================

/// An invoice with its line items.
///
/// ## Invariants
/// - `total_cents == Σ(item.price_cents × item.quantity)`
/// - `items` is never empty after a successful create or update
/// - `user_id` never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub total_cents: i64,

    /// Optimistic concurrency stamp: starts at 1, bumped on every update.
    pub version: i64,

    pub items: Vec<LineItem>,
}

impl Invoice {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item of an invoice.
/// Uses snapshot pattern to freeze the product price at time of pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LineItem {
    pub id: i64,
    pub invoice_id: i64,
    pub product_id: i64,

    /// Unit price in cents at time of pricing (frozen).
    pub price_cents: i64,

    pub quantity: i64,

    /// English product name, joined at read time for single-invoice
    /// fetches. `None` in listings.
    pub product_name: Option<String>,
}

impl LineItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns `price × quantity`, or `None` past the money range.
    #[inline]
    pub fn subtotal(&self) -> Option<Money> {
        self.unit_price().checked_mul_quantity(self.quantity)
    }
}

// =============================================================================
// Invoice Drafts
// =============================================================================

/// A priced line that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: i64,
    pub unit_price: Money,
    pub quantity: i64,
    pub subtotal: Money,
}

/// A fully priced and validated candidate invoice, ready to be written in
/// one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub total: Money,
    pub lines: Vec<PricedLine>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("visitor".parse::<Role>().unwrap(), Role::Visitor);
        assert!("cashier".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "Admin");
    }

    #[test]
    fn test_role_serde_uses_variant_names() {
        assert_eq!(serde_json::to_string(&Role::Visitor).unwrap(), "\"Visitor\"");
    }

    #[test]
    fn test_user_never_serializes_password_hash() {
        let user = User {
            id: 1,
            full_name: "System Admin".to_string(),
            email: "admin@example.com".to_string(),
            username: "admin".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_line_item_subtotal() {
        let item = LineItem {
            id: 1,
            invoice_id: 1,
            product_id: 3,
            price_cents: 5000,
            quantity: 3,
            product_name: None,
        };
        assert_eq!(item.subtotal(), Some(Money::from_cents(15_000)));
    }

    #[test]
    fn test_upsert_tags() {
        let created = Upsert::Created(5);
        assert!(created.is_created());
        assert_eq!(Upsert::Updated(7).into_inner(), 7);
    }
}
