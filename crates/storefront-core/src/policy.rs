//! # Access Policy
//!
//! Who may see which invoice, and role gates for boundary operations.
//!
//! ```text
//! caller.role == Admin      ──► allowed
//! caller.user_id == owner   ──► allowed
//! otherwise                 ──► Forbidden
//! ```
//!
//! The policy runs after the invoice is known to exist, so a missing
//! invoice is always reported as not found, never as forbidden.

use crate::error::{CoreError, CoreResult};
use crate::types::{Caller, Invoice, Role};

/// Returns true when `caller` may view `invoice`.
pub fn can_view(invoice: &Invoice, caller: &Caller) -> bool {
    caller.is_admin() || invoice.user_id == caller.user_id
}

/// [`can_view`] as a `Result`.
pub fn authorize_view(invoice: &Invoice, caller: &Caller) -> CoreResult<()> {
    if can_view(invoice, caller) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "invoice {} belongs to another user",
            invoice.id
        )))
    }
}

/// Fails with `Forbidden` unless the caller holds one of `allowed`.
pub fn require_role(caller: &Caller, allowed: &[Role]) -> CoreResult<()> {
    if allowed.contains(&caller.role) {
        return Ok(());
    }

    let names: Vec<&str> = allowed.iter().map(Role::as_str).collect();
    Err(CoreError::Forbidden(format!(
        "requires role {}",
        names.join(" or ")
    )))
}
