//! `/api/products` routes.
//!
//! Prices cross the wire as exact decimals (`"25.50"`) and become
//! [`Money`] before reaching the catalog service.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_core::policy::require_role;
use storefront_core::validation::validate_positive_id;
use storefront_core::{CoreError, Money, Product, ProductInput, Role, Upsert};

use super::{IdRequest, MessageResponse};
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

const READERS: &[Role] = &[Role::Admin, Role::Visitor];
const MANAGERS: &[Role] = &[Role::Admin];

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub english_name: String,
    pub arabic_name: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        ProductDto {
            id: product.id,
            price: product.price().to_decimal(),
            english_name: product.english_name,
            arabic_name: product.arabic_name,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub total_items: i64,
    pub page: i64,
    pub page_size: i64,
    pub items: Vec<ProductDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub english_name: String,
    #[serde(default)]
    pub arabic_name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub message: String,
    pub product: ProductDto,
}

// =============================================================================
// Handlers
// =============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/getAll", post(get_all))
        .route("/getById", post(get_by_id))
        .route("/createOrUpdate", post(create_or_update))
        .route("/delete", post(delete))
}

async fn get_all(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<PageRequest>,
) -> ApiResult<Json<ProductPage>> {
    require_role(&user.caller, READERS)?;

    let page = state.catalog.list(request.page, request.page_size).await?;

    Ok(Json(ProductPage {
        total_items: page.total_items,
        page: page.page,
        page_size: page.page_size,
        items: page.items.into_iter().map(ProductDto::from).collect(),
    }))
}

async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<IdRequest>,
) -> ApiResult<Json<ProductDto>> {
    require_role(&user.caller, READERS)?;
    validate_positive_id("Product ID", request.id).map_err(CoreError::from)?;

    match state.catalog.get(request.id).await? {
        Some(product) => Ok(Json(product.into())),
        None => Err(product_not_found(request.id)),
    }
}

async fn create_or_update(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<ProductRequest>,
) -> ApiResult<Json<ProductResponse>> {
    require_role(&user.caller, MANAGERS)?;

    let price = Money::from_decimal("Price", request.price).map_err(CoreError::from)?;
    let input = ProductInput {
        id: request.id,
        english_name: request.english_name,
        arabic_name: request.arabic_name,
        price,
    };

    let response = match state.catalog.create_or_update(&input).await? {
        Upsert::Created(product) => ProductResponse {
            message: "Product created successfully.".to_string(),
            product: product.into(),
        },
        Upsert::Updated(product) => ProductResponse {
            message: "Product updated successfully.".to_string(),
            product: product.into(),
        },
    };

    Ok(Json(response))
}

async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<IdRequest>,
) -> ApiResult<Json<MessageResponse>> {
    require_role(&user.caller, MANAGERS)?;
    validate_positive_id("Product ID", request.id).map_err(CoreError::from)?;

    if state.catalog.delete(request.id).await? {
        Ok(Json(MessageResponse::new("Product deleted successfully.")))
    } else {
        Err(product_not_found(request.id))
    }
}

fn product_not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("Product with ID {} not found.", id))
}
