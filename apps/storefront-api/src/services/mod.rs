//! Application services that sit between the HTTP routes and storefront-db.
//!
//! Invoice and catalog operations live in `storefront-db`; account handling
//! lives here because it needs password hashing and token issuing.

pub mod auth_service;
