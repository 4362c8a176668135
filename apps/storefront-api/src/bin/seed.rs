//! Seeds demo accounts and products into the configured database.
//!
//! ```text
//! DATABASE_PATH=./storefront.db cargo run -p storefront-api --bin seed
//! ```
//!
//! Accounts (only when the users table is empty):
//! - `admin` / `admin123` (Admin)
//! - `visitor` / `visitor123` (Visitor)

use storefront_api::config::ApiConfig;
use storefront_api::init_tracing;
use storefront_api::services::auth_service::seed_demo;
use storefront_db::{Database, DbConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ApiConfig::load()?;
    let db = Database::new(DbConfig::new(&config.database_path)).await?;

    let report = seed_demo(&db).await?;
    info!(
        path = %config.database_path,
        users = report.users,
        products = report.products,
        "Seeding finished"
    );

    db.close().await;
    Ok(())
}
