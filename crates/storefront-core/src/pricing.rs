//! # Pricing Module
//!
//! The line-item pricer and the invoice aggregator.
//!
//! ## Pricing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        build_invoice()                                  │
//! │                                                                         │
//! │  requests: [{product 1, qty 2}, {product 3, qty 3}]                     │
//! │       │                                                                 │
//! │       ├── empty? ─────────────────────────────► EmptyInvoice            │
//! │       ▼                                                                 │
//! │  price_line() per request                                               │
//! │  ├── qty <= 0 ──────────────────────────────► ValidationFailed          │
//! │  ├── catalog miss ──────────────────────────► ProductNotFound(id)       │
//! │  └── snapshot unit price, subtotal = price × qty                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  aggregate(): total = Σ subtotal ──── overflow ─► AmountOverflow        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_invoice_draft() ── violations ────► ValidationFailed          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InvoiceDraft (nothing written yet)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog is abstracted by [`CatalogLookup`]. The database layer loads
//! the referenced products inside its transaction and hands the pricer an
//! in-memory snapshot, so everything here stays synchronous and pure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{InvoiceDraft, PricedLine};
use crate::validation::validate_invoice_draft;

// =============================================================================
// Catalog Lookup
// =============================================================================

/// What the pricer needs to know about a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub product_id: i64,
    pub unit_price: Money,
    pub display_name: String,
}

/// Resolves a product id to its current price and display name.
///
/// Implementations must resolve soft-deleted products too: they are gone
/// from listings, not from history.
pub trait CatalogLookup {
    fn find_product(&self, product_id: i64) -> Option<&CatalogEntry>;
}

impl CatalogLookup for HashMap<i64, CatalogEntry> {
    fn find_product(&self, product_id: i64) -> Option<&CatalogEntry> {
        self.get(&product_id)
    }
}

// =============================================================================
// Line Requests
// =============================================================================

/// A requested invoice line: which product and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub product_id: i64,
    pub quantity: i64,
}

impl LineRequest {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

// =============================================================================
// Pricer
// =============================================================================

/// Prices one requested line against the catalog.
///
/// ## Returns
/// A [`PricedLine`] whose unit price is a snapshot of the product's current
/// price. No database write happens here.
///
/// ## Errors
/// - `ValidationFailed` when `quantity <= 0`
/// - `ProductNotFound(id)` when the catalog does not know the product
/// - `AmountOverflow` when `price × quantity` leaves the money range
pub fn price_line<C: CatalogLookup + ?Sized>(
    catalog: &C,
    request: &LineRequest,
) -> CoreResult<PricedLine> {
    if request.quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "Quantity".to_string(),
        }
        .into());
    }

    let entry = catalog
        .find_product(request.product_id)
        .ok_or(CoreError::ProductNotFound(request.product_id))?;

    let subtotal = entry
        .unit_price
        .checked_mul_quantity(request.quantity)
        .ok_or(CoreError::AmountOverflow)?;

    Ok(PricedLine {
        product_id: entry.product_id,
        unit_price: entry.unit_price,
        quantity: request.quantity,
        subtotal,
    })
}

// =============================================================================
// Aggregator
// =============================================================================

/// Sums line subtotals into an invoice total.
///
/// Returns zero for an empty slice; rejecting empty invoices is the job of
/// [`build_invoice`].
pub fn aggregate(lines: &[PricedLine]) -> CoreResult<Money> {
    lines.iter().try_fold(Money::zero(), |total, line| {
        total
            .checked_add(line.subtotal)
            .ok_or(CoreError::AmountOverflow)
    })
}

/// Runs the complete create pipeline in memory: empty check, pricing,
/// aggregation and whole-invoice validation.
///
/// Used for both create (fresh `created_at`) and update (the existing
/// invoice's owner and date).
///
/// ## Example
/// ```rust
/// use std::collections::HashMap;
/// use chrono::Utc;
/// use storefront_core::pricing::{build_invoice, CatalogEntry, LineRequest};
/// use storefront_core::Money;
///
/// let mut catalog: HashMap<i64, CatalogEntry> = HashMap::new();
/// catalog.insert(1, CatalogEntry {
///     product_id: 1,
///     unit_price: Money::from_cents(10_000),
///     display_name: "Laptop".to_string(),
/// });
///
/// let now = Utc::now();
/// let draft = build_invoice(&catalog, 2, now, now, &[LineRequest::new(1, 2)]).unwrap();
/// assert_eq!(draft.total.to_string(), "200.00");
/// ```
pub fn build_invoice<C: CatalogLookup + ?Sized>(
    catalog: &C,
    user_id: i64,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    requests: &[LineRequest],
) -> CoreResult<InvoiceDraft> {
    if requests.is_empty() {
        return Err(CoreError::EmptyInvoice);
    }

    let lines = requests
        .iter()
        .map(|request| price_line(catalog, request))
        .collect::<CoreResult<Vec<_>>>()?;

    let total = aggregate(&lines)?;

    let draft = InvoiceDraft {
        user_id,
        created_at,
        total,
        lines,
    };

    let violations = validate_invoice_draft(&draft, now);
    if !violations.is_empty() {
        return Err(CoreError::ValidationFailed(violations));
    }

    Ok(draft)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn catalog() -> HashMap<i64, CatalogEntry> {
        [(1, 10_000, "Laptop"), (2, 2550, "Mouse"), (3, 5000, "Keyboard")]
            .into_iter()
            .map(|(id, cents, name)| {
                (
                    id,
                    CatalogEntry {
                        product_id: id,
                        unit_price: Money::from_cents(cents),
                        display_name: name.to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_price_line_snapshots_price() {
        let line = price_line(&catalog(), &LineRequest::new(2, 4)).unwrap();
        assert_eq!(line.unit_price, Money::from_cents(2550));
        assert_eq!(line.subtotal, Money::from_cents(10_200));
    }

    #[test]
    fn test_price_line_rejects_non_positive_quantity() {
        let err = price_line(&catalog(), &LineRequest::new(1, 0)).unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed(_)));
    }

    #[test]
    fn test_price_line_unknown_product() {
        let err = price_line(&catalog(), &LineRequest::new(99, 1)).unwrap_err();
        assert_eq!(err, CoreError::ProductNotFound(99));
    }

    #[test]
    fn test_aggregate_is_exact_sum() {
        let lines = vec![
            price_line(&catalog(), &LineRequest::new(1, 2)).unwrap(),
            price_line(&catalog(), &LineRequest::new(3, 3)).unwrap(),
        ];
        // 100.00 × 2 + 50.00 × 3 = 350.00
        assert_eq!(aggregate(&lines).unwrap(), Money::from_cents(35_000));
        assert_eq!(aggregate(&[]).unwrap(), Money::zero());
    }

    #[test]
    fn test_aggregate_overflow() {
        let huge = PricedLine {
            product_id: 1,
            unit_price: Money::from_cents(1),
            quantity: 1,
            subtotal: Money::from_cents(crate::MAX_AMOUNT_CENTS),
        };
        let err = aggregate(&[huge.clone(), huge]).unwrap_err();
        assert_eq!(err, CoreError::AmountOverflow);
    }

    #[test]
    fn test_build_invoice_empty() {
        let now = Utc::now();
        let err = build_invoice(&catalog(), 2, now, now, &[]).unwrap_err();
        assert_eq!(err, CoreError::EmptyInvoice);
    }

    #[test]
    fn test_build_invoice_missing_product_aborts() {
        let now = Utc::now();
        let err = build_invoice(
            &catalog(),
            2,
            now,
            now,
            &[LineRequest::new(1, 1), LineRequest::new(42, 1)],
        )
        .unwrap_err();
        assert_eq!(err, CoreError::ProductNotFound(42));
    }

    #[test]
    fn test_build_invoice_validates_candidate() {
        let now = Utc::now();
        let err = build_invoice(
            &catalog(),
            2,
            now + Duration::hours(1),
            now,
            &[LineRequest::new(1, 10_001)],
        )
        .unwrap_err();

        assert_eq!(
            err.messages(),
            vec![
                "Date cannot be in the future.".to_string(),
                "Quantity must not exceed 10,000.".to_string(),
            ]
        );
    }

    #[test]
    fn test_build_invoice_success() {
        let now = Utc::now();
        let draft = build_invoice(
            &catalog(),
            2,
            now,
            now,
            &[LineRequest::new(1, 2), LineRequest::new(3, 1)],
        )
        .unwrap();
        assert_eq!(draft.total, Money::from_cents(25_000));
        assert_eq!(draft.lines.len(), 2);
        assert_eq!(draft.user_id, 2);
    }
}
