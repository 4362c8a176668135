//! # HTTP Routes
//!
//! Every endpoint takes a JSON body through `POST`, apart from `/health`.
//!
//! ```text
//! /health                          GET   anyone
//! /api/auth/{register,login}       POST  anyone
//! /api/products/getAll, getById    POST  Admin, Visitor
//! /api/products/createOrUpdate     POST  Admin
//! /api/products/delete             POST  Admin
//! /api/invoices/create             POST  Visitor
//! /api/invoices/getById            POST  Admin, Visitor (owner only)
//! /api/invoices/getAll, update     POST  Admin
//! ```

use serde::{Deserialize, Serialize};

pub mod auth;
pub mod health;
pub mod invoices;
pub mod products;

/// `{ "id": 7 }`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IdRequest {
    pub id: i64,
}

/// `{ "message": "..." }`
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}
