//! # Demo Data
//!
//! Populates an empty database with the demo accounts and a small catalog.
//!
//! Password hashing belongs to the HTTP app, so callers pass users whose
//! passwords are already hashed.

use tracing::info;

use crate::error::DbResult;
use crate::pool::Database;
use crate::repository::user::NewUser;
use storefront_core::{Money, ProductInput};

/// Demo catalog: (English name, Arabic name, price in cents).
pub const DEMO_PRODUCTS: &[(&str, &str, i64)] = &[
    ("Laptop", "لابتوب", 150_000),
    ("Mouse", "ماوس", 2550),
    ("Keyboard", "لوحة مفاتيح", 5000),
];

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub products: usize,
}

/// Inserts `users` when the users table is empty and the demo products when
/// the products table is empty. Safe to run repeatedly.
pub async fn seed_demo_data(db: &Database, users: &[NewUser]) -> DbResult<SeedReport> {
    let mut report = SeedReport::default();

    if db.users().count().await? == 0 {
        for user in users {
            db.users().insert(user).await?;
            report.users += 1;
        }
    }

    if db.products().count().await? == 0 {
        for (english_name, arabic_name, cents) in DEMO_PRODUCTS {
            db.products()
                .insert(&ProductInput {
                    id: 0,
                    english_name: english_name.to_string(),
                    arabic_name: arabic_name.to_string(),
                    price: Money::from_cents(*cents),
                })
                .await?;
            report.products += 1;
        }
    }

    info!(
        users = report.users,
        products = report.products,
        "Demo data seeded"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;
    use storefront_core::Role;

    fn admin() -> NewUser {
        NewUser {
            full_name: "System Admin".to_string(),
            email: "admin@storefront.local".to_string(),
            username: "admin".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Admin,
        }
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let first = seed_demo_data(&db, &[admin()]).await.unwrap();
        assert_eq!(first, SeedReport { users: 1, products: 3 });

        let second = seed_demo_data(&db, &[admin()]).await.unwrap();
        assert_eq!(second, SeedReport::default());

        let page = db.products().list_active(1, 10).await.unwrap();
        assert_eq!(page[1].english_name, "Mouse");
        assert_eq!(page[1].price_cents, 2550);
    }
}
