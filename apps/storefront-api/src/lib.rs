//! # storefront-api: HTTP Back-Office API
//!
//! Exposes authentication, the product catalog and the invoice store
//! operations as JSON endpoints.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront API Server                            │
//! │                                                                         │
//! │  Client ──► axum Router (8080) ──► AuthUser ──► Handler                 │
//! │                  │                 (JWT)          │                     │
//! │             TraceLayer                            ▼                     │
//! │                                    InvoiceService / CatalogService      │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │                                                SQLite                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Environment configuration
//! - [`auth`] - JWT tokens, password hashing, caller extraction
//! - [`error`] - Error-to-status translation
//! - [`routes`] - HTTP handlers and DTOs
//! - [`services`] - Account registration, login and seeding

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use storefront_db::{CatalogService, Database, InvoiceService};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::auth::JwtManager;
use crate::config::ApiConfig;
use crate::services::auth_service::AuthService;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub invoices: InvoiceService,
    pub catalog: CatalogService,
    pub auth: AuthService,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(db: Database, config: &ApiConfig) -> Self {
        let jwt = Arc::new(JwtManager::new(
            config.jwt_secret.clone(),
            config.jwt_issuer.clone(),
            config.jwt_audience.clone(),
            config.jwt_lifetime_secs,
        ));

        AppState {
            invoices: InvoiceService::new(db.clone()),
            catalog: CatalogService::new(db.clone()),
            auth: AuthService::new(db.clone(), jwt.clone()),
            jwt,
            db,
        }
    }
}

/// Builds the full router with request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api/auth", routes::auth::router())
        .nest("/api/products", routes::products::router())
        .nest("/api/invoices", routes::invoices::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - ERROR: Storage faults surfaced as 500
/// - WARN: Denied access, rejected logins
/// - INFO: Lifecycle events (invoice created, user registered)
/// - DEBUG: Repository calls
///
/// Override with `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug,sqlx=warn,tower_http=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
