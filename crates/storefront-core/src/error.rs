//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                     │
//! │  ├── CoreError        - Invoice/catalog domain failures                 │
//! │  └── ValidationError  - One violated business rule                      │
//! │                                                                         │
//! │  storefront-db errors (separate crate)                                  │
//! │  ├── DbError          - Database operation failures                     │
//! │  └── ServiceError     - CoreError | DbError at the store boundary       │
//! │                                                                         │
//! │  HTTP errors (in app)                                                   │
//! │  └── ApiError         - What clients see (JSON + status code)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → ApiError → Client   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Mapping (done by the API layer)
//! | Variant                           | HTTP |
//! |-----------------------------------|------|
//! | `EmptyInvoice`, `ValidationFailed`, `AmountOverflow` | 400 |
//! | `ProductNotFound`                 | 400  |
//! | `Forbidden`                       | 403  |
//! | `InvoiceNotFound`                 | 404  |
//! | `VersionConflict`                 | 409  |

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every failure of an invoice or catalog operation that is not a storage
/// fault is one of these variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An invoice was submitted without any line items.
    #[error("Invoice must have at least one detail.")]
    EmptyInvoice,

    /// A requested product id does not resolve in the catalog.
    ///
    /// ## When This Occurs
    /// - Product ID doesn't exist in database
    /// - Raised by the pricer; aborts the whole create/update
    ///
    /// Soft-deleted products still resolve and never raise this.
    #[error("Product with ID {0} not found.")]
    ProductNotFound(i64),

    /// One or more business rules were violated. All violations are reported
    /// together.
    #[error("Validation failed: {}", join_messages(.0))]
    ValidationFailed(Vec<ValidationError>),

    #[error("Invoice with ID {0} not found.")]
    InvoiceNotFound(i64),

    /// The caller is authenticated but may not perform the operation.
    ///
    /// Never used for "does not exist": existence is checked first.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// An update carried a stale expected version.
    ///
    /// ## User Workflow
    /// ```text
    /// Admin A reads invoice 7 (version 3)     Admin B reads invoice 7 (version 3)
    ///      │                                        │
    ///      ▼                                        ▼
    /// update(7, lines, Some(3)) ── ok ──► version 4
    ///                                          update(7, lines, Some(3))
    ///                                               │
    ///                                               ▼
    ///                                  VersionConflict { expected: 3, actual: 4 }
    /// ```
    #[error("Invoice {invoice_id} was modified concurrently: expected version {expected}, found {actual}")]
    VersionConflict {
        invoice_id: i64,
        expected: i64,
        actual: i64,
    },

    /// A computed amount left the 18-digit money range.
    #[error("Amount exceeds the supported range of 18 total digits.")]
    AmountOverflow,
}

impl CoreError {
    /// Returns the individual rule messages carried by this error.
    ///
    /// For non-validation variants this is the single display message.
    pub fn messages(&self) -> Vec<String> {
        match self {
            CoreError::ValidationFailed(errors) => errors.iter().map(|e| e.to_string()).collect(),
            other => vec![other.to_string()],
        }
    }
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        CoreError::ValidationFailed(vec![err])
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// One variant instance per violated rule. `field` is the human-readable
/// field label ("Quantity", "Arabic name") so the rendered message can be
/// shown to clients as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required.")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters.")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must not exceed {max} characters.")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be greater than zero.")]
    MustBePositive { field: String },

    #[error("{field} cannot be negative.")]
    Negative { field: String },

    /// Value is above its upper bound (`max` is preformatted, e.g. "10,000").
    #[error("{field} must not exceed {max}.")]
    TooLarge { field: String, max: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}.")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} cannot be in the future.")]
    InFuture { field: String },

    /// Invalid format (e.g., malformed email, too many decimal places).
    #[error("{field} has invalid format: {reason}.")]
    InvalidFormat { field: String, reason: String },

    /// An invoice candidate carries no lines.
    #[error("Invoice must have at least one detail.")]
    NoLineItems,

    /// Duplicate value (e.g., username already taken).
    #[error("{field} '{value}' already exists.")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
