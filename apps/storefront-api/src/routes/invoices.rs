//! `/api/invoices` routes.
//!
//! ```text
//! create   Visitor   owner = caller
//! getById  Admin | Visitor, visitors see only their own
//! getAll   Admin     items without product names
//! update   Admin     replaces all lines, optional version check
//! ```

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_core::policy::require_role;
use storefront_core::validation::{validate_line_requests, validate_positive_id};
use storefront_core::{CoreError, Invoice, LineItem, LineRequest, Role};
use tracing::info;

use super::IdRequest;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::AppState;

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
    pub id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub total_amount: Decimal,
    pub version: i64,
    pub details: Vec<InvoiceDetailDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetailDto {
    pub id: i64,
    pub product_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub price: Decimal,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,
}

impl From<LineItem> for InvoiceDetailDto {
    fn from(item: LineItem) -> Self {
        InvoiceDetailDto {
            id: item.id,
            product_id: item.product_id,
            price: item.unit_price().to_decimal(),
            quantity: item.quantity,
            subtotal: item.subtotal().map(|m| m.to_decimal()),
            product_name: item.product_name,
        }
    }
}

impl From<Invoice> for InvoiceDto {
    fn from(invoice: Invoice) -> Self {
        InvoiceDto {
            id: invoice.id,
            user_id: invoice.user_id,
            created_at: invoice.created_at,
            total_amount: invoice.total().to_decimal(),
            version: invoice.version,
            details: invoice.items.into_iter().map(InvoiceDetailDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceRequest {
    #[serde(default)]
    pub details: Vec<LineRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInvoiceRequest {
    pub id: i64,
    #[serde(default)]
    pub details: Vec<LineRequest>,
    /// Version the client last read; omitted means "last writer wins".
    #[serde(default)]
    pub version: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    pub message: String,
    pub invoice: InvoiceDto,
}

// =============================================================================
// Handlers
// =============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/getById", post(get_by_id))
        .route("/getAll", post(get_all))
        .route("/update", post(update))
}

/// Rejects malformed lines with every violated rule before touching storage.
fn check_lines(lines: &[LineRequest]) -> Result<(), CoreError> {
    let violations = validate_line_requests(lines);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(CoreError::ValidationFailed(violations))
    }
}

async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateInvoiceRequest>,
) -> ApiResult<Json<InvoiceResponse>> {
    require_role(&user.caller, &[Role::Visitor])?;
    check_lines(&request.details)?;

    let invoice = state.invoices.create(user.caller.user_id, &request.details).await?;
    info!(invoice_id = %invoice.id, username = %user.username, "Invoice created via API");

    Ok(Json(InvoiceResponse {
        message: "Invoice created successfully.".to_string(),
        invoice: invoice.into(),
    }))
}

async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<IdRequest>,
) -> ApiResult<Json<InvoiceDto>> {
    require_role(&user.caller, &[Role::Admin, Role::Visitor])?;
    validate_positive_id("Invoice ID", request.id).map_err(CoreError::from)?;

    let invoice = state.invoices.get_by_id(request.id, &user.caller).await?;
    Ok(Json(invoice.into()))
}

async fn get_all(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Vec<InvoiceDto>>> {
    require_role(&user.caller, &[Role::Admin])?;

    let invoices = state.invoices.list_all().await?;
    Ok(Json(invoices.into_iter().map(InvoiceDto::from).collect()))
}

async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<UpdateInvoiceRequest>,
) -> ApiResult<Json<InvoiceResponse>> {
    require_role(&user.caller, &[Role::Admin])?;
    validate_positive_id("Invoice ID", request.id).map_err(CoreError::from)?;

    // A missing invoice is a 404 no-op whatever the lines look like.
    if let Err(malformed) = check_lines(&request.details) {
        if state.db.invoices().get_without_names(request.id).await?.is_none() {
            return Err(CoreError::InvoiceNotFound(request.id).into());
        }
        return Err(malformed.into());
    }

    let Some(invoice) = state
        .invoices
        .update(request.id, &request.details, request.version)
        .await?
    else {
        return Err(CoreError::InvoiceNotFound(request.id).into());
    };

    Ok(Json(InvoiceResponse {
        message: "Invoice updated successfully.".to_string(),
        invoice: invoice.into(),
    }))
}
