//! # Validation Module
//!
//! Business rule validation for the storefront back-office.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP request (storefront-api)                                 │
//! │  ├── Deserialization (types, decimals)                                  │
//! │  └── Request shape: validate_line_requests, validate_pagination         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Store operations (storefront-db services)                     │
//! │  └── THIS MODULE: validate_invoice_draft, validate_product, ...         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── CHECK constraints on money and quantity                            │
//! │  ├── UNIQUE constraints (username, email)                               │
//! │  └── Foreign key constraints                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Single-field validators return [`ValidationResult`]; whole-object
//! validators collect every violation into a `Vec` so clients see all
//! problems at once. An empty `Vec` means valid.
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_quantity, validate_product_name};
//!
//! validate_quantity(5).unwrap();
//! assert!(validate_quantity(10_001).is_err());
//! assert!(validate_product_name("Arabic name", "   ").is_err());
//! ```

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::money::Money;
use crate::pricing::LineRequest;
use crate::types::{InvoiceDraft, ProductInput, Registration};
use crate::{MAX_LINE_QUANTITY, MAX_PRODUCT_NAME_LENGTH, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest allowed page size for catalog listings.
pub const MAX_PAGE_SIZE: i64 = 100;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MAX_EMAIL_LENGTH: usize = 100;
pub const MAX_FULL_NAME_LENGTH: usize = 100;
pub const MIN_PASSWORD_LENGTH: usize = 6;

fn push_err<T>(errors: &mut Vec<ValidationError>, result: ValidationResult<T>) {
    if let Err(e) = result {
        errors.push(e);
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a referenced identifier (`> 0`).
pub fn validate_positive_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_LINE_QUANTITY`]
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "Quantity".to_string(),
        });
    }

    if quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::TooLarge {
            field: "Quantity".to_string(),
            max: "10,000".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price (product price or line snapshot).
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed 999,999.99
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "Price".to_string(),
        });
    }

    if price.cents() > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::TooLarge {
            field: "Price".to_string(),
            max: "999,999.99".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product display name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_PRODUCT_NAME_LENGTH`] characters (counted as chars, so
///   Arabic text is measured the same way as Latin text)
pub fn validate_product_name(field: &str, name: &str) -> ValidationResult<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if trimmed.chars().count() > MAX_PRODUCT_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_PRODUCT_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates a username.
///
/// ## Rules
/// - 3 to 50 characters
/// - ASCII letters, digits and underscores only
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let field = "Username";

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let len = username.chars().count();
    if len < MIN_USERNAME_LENGTH {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min: MIN_USERNAME_LENGTH,
        });
    }
    if len > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_USERNAME_LENGTH,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "only letters, numbers and underscores are allowed".to_string(),
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// Deliberately shallow: one `@`, a non-empty local part and a dotted
/// domain.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let field = "Email";
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_EMAIL_LENGTH,
        });
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split('.')
                    .filter(|part| !part.is_empty())
                    .count()
                    >= 2
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "not a valid email address".to_string(),
        });
    }

    Ok(())
}

pub fn validate_full_name(full_name: &str) -> ValidationResult<()> {
    let field = "Full name";
    let trimmed = full_name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if trimmed.chars().count() > MAX_FULL_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_FULL_NAME_LENGTH,
        });
    }

    Ok(())
}

pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "Password".to_string(),
        });
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "Password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Object Validators
// =============================================================================

/// Validates a product before create-or-update. Reports every violation.
pub fn validate_product(input: &ProductInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    push_err(&mut errors, validate_product_name("Arabic name", &input.arabic_name));
    push_err(&mut errors, validate_product_name("English name", &input.english_name));
    push_err(&mut errors, validate_unit_price(input.price));
    errors
}

/// Validates a registration request. Reports every violation.
pub fn validate_registration(registration: &Registration) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    push_err(&mut errors, validate_full_name(&registration.full_name));
    push_err(&mut errors, validate_email(&registration.email));
    push_err(&mut errors, validate_username(&registration.username));
    push_err(&mut errors, validate_password(&registration.password));
    errors
}

/// Request-shape validation for the lines of an invoice create/update.
///
/// ## Rules
/// - At least one line
/// - Every `product_id > 0`
/// - Every `quantity > 0`
pub fn validate_line_requests(lines: &[LineRequest]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if lines.is_empty() {
        errors.push(ValidationError::NoLineItems);
        return errors;
    }

    for line in lines {
        push_err(&mut errors, validate_positive_id("Product ID", line.product_id));
        if line.quantity <= 0 {
            errors.push(ValidationError::MustBePositive {
                field: "Quantity".to_string(),
            });
        }
    }

    errors
}

/// Validates a complete candidate invoice against `now`.
///
/// ## Rules
/// - Owner id > 0
/// - Creation date not in the future
/// - Total >= 0
/// - At least one line
/// - Every line: product id > 0, quantity 1-10,000, price > 0 and
///   <= 999,999.99
pub fn validate_invoice_draft(draft: &InvoiceDraft, now: DateTime<Utc>) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    push_err(&mut errors, validate_positive_id("User ID", draft.user_id));

    if draft.created_at > now {
        errors.push(ValidationError::InFuture {
            field: "Date".to_string(),
        });
    }

    if draft.total.is_negative() {
        errors.push(ValidationError::Negative {
            field: "Total amount".to_string(),
        });
    }

    if draft.lines.is_empty() {
        errors.push(ValidationError::NoLineItems);
    }

    for line in &draft.lines {
        push_err(&mut errors, validate_positive_id("Product ID", line.product_id));
        push_err(&mut errors, validate_quantity(line.quantity));
        push_err(&mut errors, validate_unit_price(line.unit_price));
    }

    errors
}

/// Validates catalog pagination parameters.
pub fn validate_pagination(page: i64, page_size: i64) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if page < 1 {
        errors.push(ValidationError::MustBePositive {
            field: "Page".to_string(),
        });
    }

    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        errors.push(ValidationError::OutOfRange {
            field: "Page size".to_string(),
            min: 1,
            max: MAX_PAGE_SIZE,
        });
    } else if page >= 1 && page_offset(page, page_size).is_none() {
        errors.push(ValidationError::TooLarge {
            field: "Page".to_string(),
            max: (i64::MAX / page_size).to_string(),
        });
    }

    errors
}

/// Row offset of a 1-based page, or `None` when it does not fit in an `i64`.
pub fn page_offset(page: i64, page_size: i64) -> Option<i64> {
    page.checked_sub(1)?.max(0).checked_mul(page_size)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PricedLine;
    use chrono::Duration;

    fn line(product_id: i64, price_cents: i64, quantity: i64) -> PricedLine {
        let unit_price = Money::from_cents(price_cents);
        PricedLine {
            product_id,
            unit_price,
            quantity,
            subtotal: unit_price.checked_mul_quantity(quantity).unwrap(),
        }
    }

    fn draft(lines: Vec<PricedLine>) -> InvoiceDraft {
        InvoiceDraft {
            user_id: 2,
            created_at: Utc::now(),
            total: Money::from_cents(lines.iter().map(|l| l.subtotal.cents()).sum()),
            lines,
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());

        let err = validate_quantity(0).unwrap_err();
        assert_eq!(err.to_string(), "Quantity must be greater than zero.");

        let err = validate_quantity(10_001).unwrap_err();
        assert_eq!(err.to_string(), "Quantity must not exceed 10,000.");
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(Money::from_cents(1)).is_ok());
        assert!(validate_unit_price(Money::from_cents(MAX_UNIT_PRICE_CENTS)).is_ok());
        assert_eq!(
            validate_unit_price(Money::zero()).unwrap_err().to_string(),
            "Price must be greater than zero."
        );
        assert_eq!(
            validate_unit_price(Money::from_cents(100_000_000))
                .unwrap_err()
                .to_string(),
            "Price must not exceed 999,999.99."
        );
    }

    #[test]
    fn test_validate_product_name_counts_chars() {
        assert!(validate_product_name("Arabic name", "لوحة مفاتيح").is_ok());
        // 200 Arabic letters are 400 bytes but still within the limit
        assert!(validate_product_name("Arabic name", &"ب".repeat(200)).is_ok());
        assert_eq!(
            validate_product_name("Arabic name", &"ب".repeat(201))
                .unwrap_err()
                .to_string(),
            "Arabic name must not exceed 200 characters."
        );
        assert_eq!(
            validate_product_name("English name", "  ").unwrap_err().to_string(),
            "English name is required."
        );
    }

    #[test]
    fn test_validate_product_reports_all() {
        let input = ProductInput {
            id: 0,
            english_name: String::new(),
            arabic_name: String::new(),
            price: Money::zero(),
        };
        let errors = validate_product(&input);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("visitor_1").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("admin@example.com").is_ok());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("a@b@example.com").is_err());
        assert!(validate_email("user@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_validate_registration() {
        let registration = Registration {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            username: "jane".to_string(),
            password: "secret1".to_string(),
        };
        assert!(validate_registration(&registration).is_empty());

        let bad = Registration {
            full_name: String::new(),
            email: "nope".to_string(),
            username: "j".to_string(),
            password: "123".to_string(),
        };
        assert_eq!(validate_registration(&bad).len(), 4);
    }

    #[test]
    fn test_validate_line_requests() {
        assert!(validate_line_requests(&[LineRequest::new(1, 2)]).is_empty());
        assert_eq!(validate_line_requests(&[]).len(), 1);

        let errors = validate_line_requests(&[LineRequest::new(0, 0), LineRequest::new(3, -1)]);
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "Product ID must be greater than zero.",
                "Quantity must be greater than zero.",
                "Quantity must be greater than zero.",
            ]
        );
    }

    #[test]
    fn test_validate_invoice_draft_ok() {
        let candidate = draft(vec![line(1, 10_000, 2), line(3, 5000, 3)]);
        assert!(validate_invoice_draft(&candidate, Utc::now()).is_empty());
    }

    #[test]
    fn test_validate_invoice_draft_collects_violations() {
        let mut candidate = draft(vec![line(1, 10_000, 10_001)]);
        candidate.user_id = 0;
        candidate.created_at = Utc::now() + Duration::days(1);

        let messages: Vec<String> = validate_invoice_draft(&candidate, Utc::now())
            .iter()
            .map(|e| e.to_string())
            .collect();

        assert_eq!(
            messages,
            vec![
                "User ID must be greater than zero.",
                "Date cannot be in the future.",
                "Quantity must not exceed 10,000.",
            ]
        );
    }

    #[test]
    fn test_validate_invoice_draft_negative_total_and_no_lines() {
        let mut candidate = draft(vec![]);
        candidate.total = Money::from_cents(-1);

        let messages: Vec<String> = validate_invoice_draft(&candidate, Utc::now())
            .iter()
            .map(|e| e.to_string())
            .collect();
        assert!(messages.contains(&"Total amount cannot be negative.".to_string()));
        assert!(messages.contains(&"Invoice must have at least one detail.".to_string()));
    }

    #[test]
    fn test_validate_pagination() {
        assert!(validate_pagination(1, 10).is_empty());
        assert!(validate_pagination(3, 100).is_empty());
        assert_eq!(validate_pagination(0, 10).len(), 1);
        assert_eq!(validate_pagination(1, 101).len(), 1);
        assert_eq!(validate_pagination(0, 0).len(), 2);
    }

    #[test]
    fn test_validate_pagination_rejects_unreachable_page() {
        let errors = validate_pagination(i64::MAX / 10, 100);
        assert_eq!(
            errors,
            vec![ValidationError::TooLarge {
                field: "Page".to_string(),
                max: (i64::MAX / 100).to_string(),
            }]
        );

        assert_eq!(page_offset(3, 10), Some(20));
        assert_eq!(page_offset(i64::MAX, 2), None);
    }
}
