//! `/api/auth` routes.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use storefront_core::Registration;

use super::MessageResponse;
use crate::error::ApiResult;
use crate::services::auth_service::LoginResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    Json(registration): Json<Registration>,
) -> ApiResult<Json<MessageResponse>> {
    state.auth.register(&registration).await?;
    Ok(Json(MessageResponse::new("User registered successfully.")))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResult>> {
    let result = state.auth.login(&request.username, &request.password).await?;
    Ok(Json(result))
}
