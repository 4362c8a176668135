//! # Invoice Store Operations
//!
//! Create, fetch, list and update invoices. This is where pricing, access
//! policy and transactions meet.
//!
//! ## Update: Stage, Validate, Swap
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    header = fetch_header(id)          missing ──► Ok(None), no write    │
//! │    expected_version != header.version ──────────► VersionConflict       │
//! │    catalog = load_catalog(line ids)                                     │
//! │    draft = build_invoice(catalog, owner, created_at, now, lines)        │
//! │            ProductNotFound / ValidationFailed ──► rollback (old lines   │
//! │                                                   and total untouched)  │
//! │    delete_items(id)                                                     │
//! │    insert_items(id, draft.lines)                                        │
//! │    update_total(id, draft.total, header.version)  0 rows ──► Conflict   │
//! │  COMMIT                                                                 │
//! │  re-fetch with product names                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any early return drops the transaction, which rolls it back, so a failed
//! or cancelled request never leaves a half-written invoice.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{DbError, ServiceResult};
use crate::pool::Database;
use crate::repository::invoice::InvoiceRepository;
use crate::repository::product::load_catalog;
use storefront_core::policy::authorize_view;
use storefront_core::pricing::build_invoice;
use storefront_core::{Caller, CoreError, Invoice, LineRequest};

/// Invoice lifecycle operations.
///
/// ## Usage
/// ```rust,ignore
/// let invoices = InvoiceService::new(db.clone());
///
/// let created = invoices.create(caller.user_id, &lines).await?;
/// let visible = invoices.get_by_id(created.id, &caller).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceService {
    db: Database,
}

impl InvoiceService {
    pub fn new(db: Database) -> Self {
        InvoiceService { db }
    }

    /// Creates an invoice owned by `owner_id`.
    ///
    /// ## Errors
    /// - `EmptyInvoice` when `lines` is empty
    /// - `ProductNotFound(id)` for the first unknown product
    /// - `ValidationFailed` for any rule violation of the candidate invoice
    ///
    /// Nothing is stored on any of these.
    pub async fn create(&self, owner_id: i64, lines: &[LineRequest]) -> ServiceResult<Invoice> {
        if lines.is_empty() {
            return Err(CoreError::EmptyInvoice.into());
        }

        let mut tx = self.db.begin_write().await?;

        let product_ids: Vec<i64> = lines.iter().map(|l| l.product_id).collect();
        let catalog = load_catalog(&mut tx, &product_ids).await?;

        let now = Utc::now();
        let draft = build_invoice(&catalog, owner_id, now, now, lines)?;

        let id = InvoiceRepository::insert_invoice(&mut tx, &draft).await?;
        InvoiceRepository::insert_items(&mut tx, id, &draft.lines).await?;
        tx.commit().await?;

        info!(id = %id, user_id = %owner_id, total = %draft.total, "Invoice created");

        self.refetch(id).await
    }

    /// Fetches one invoice for `caller`, with product names.
    ///
    /// ## Errors
    /// - `InvoiceNotFound` when the id does not exist (regardless of role)
    /// - `Forbidden` when a visitor asks for someone else's invoice
    pub async fn get_by_id(&self, id: i64, caller: &Caller) -> ServiceResult<Invoice> {
        debug!(id = %id, caller = %caller.user_id, "Fetching invoice");

        let invoice = self
            .db
            .invoices()
            .get_with_names(id)
            .await?
            .ok_or(CoreError::InvoiceNotFound(id))?;

        if let Err(denied) = authorize_view(&invoice, caller) {
            warn!(id = %id, caller = %caller.user_id, "Invoice access denied");
            return Err(denied.into());
        }

        Ok(invoice)
    }

    /// Lists every invoice with line items, without product names.
    ///
    /// Unrestricted here; the HTTP layer limits it to admins.
    pub async fn list_all(&self) -> ServiceResult<Vec<Invoice>> {
        Ok(self.db.invoices().list_all().await?)
    }

    /// Replaces all line items of an existing invoice and recomputes its
    /// total, keeping owner and creation date.
    ///
    /// ## Arguments
    /// * `id` - Invoice to update
    /// * `lines` - The complete new set of lines
    /// * `expected_version` - When given, must equal the stored version
    ///
    /// ## Returns
    /// * `Ok(Some(invoice))` - Updated invoice with product names
    /// * `Ok(None)` - No invoice with this id; nothing was written
    pub async fn update(
        &self,
        id: i64,
        lines: &[LineRequest],
        expected_version: Option<i64>,
    ) -> ServiceResult<Option<Invoice>> {
        let mut tx = self.db.begin_write().await?;

        let Some(header) = InvoiceRepository::fetch_header(&mut tx, id).await? else {
            debug!(id = %id, "Update skipped, invoice not found");
            return Ok(None);
        };

        if let Some(expected) = expected_version {
            if expected != header.version {
                return Err(CoreError::VersionConflict {
                    invoice_id: id,
                    expected,
                    actual: header.version,
                }
                .into());
            }
        }

        if lines.is_empty() {
            return Err(CoreError::EmptyInvoice.into());
        }

        let product_ids: Vec<i64> = lines.iter().map(|l| l.product_id).collect();
        let catalog = load_catalog(&mut tx, &product_ids).await?;
        let draft = build_invoice(
            &catalog,
            header.user_id,
            header.created_at,
            Utc::now(),
            lines,
        )?;

        InvoiceRepository::delete_items(&mut tx, id).await?;
        InvoiceRepository::insert_items(&mut tx, id, &draft.lines).await?;

        if !InvoiceRepository::update_total(&mut tx, id, draft.total, header.version).await? {
            let actual = InvoiceRepository::fetch_header(&mut tx, id)
                .await?
                .map(|h| h.version)
                .unwrap_or(header.version);
            return Err(CoreError::VersionConflict {
                invoice_id: id,
                expected: header.version,
                actual,
            }
            .into());
        }

        tx.commit().await?;

        info!(
            id = %id,
            version = header.version + 1,
            total = %draft.total,
            "Invoice updated"
        );

        self.refetch(id).await.map(Some)
    }

    async fn refetch(&self, id: i64) -> ServiceResult<Invoice> {
        self.db
            .invoices()
            .get_with_names(id)
            .await?
            .ok_or_else(|| DbError::not_found("Invoice", id).into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
