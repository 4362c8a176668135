//! # Product Repository
//!
//! Database operations for catalog products.
//!
//! ## Soft Delete
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  is_deleted = 0   listed, editable, priceable                           │
//! │  is_deleted = 1   hidden from list/get/update, still priceable and      │
//! │                   still joined by id for historical invoices            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Listing and single-product reads only see active rows; the catalog
//! snapshot used for pricing sees every row.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::validation::page_offset;
use storefront_core::{CatalogEntry, Money, Product, ProductInput};

const PRODUCT_COLUMNS: &str =
    "id, english_name, arabic_name, price_cents, is_deleted, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let page = repo.list_active(1, 20).await?;
/// let product = repo.get_active(3).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by ID, including soft-deleted ones.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets an active (not deleted) product by ID.
    pub async fn get_active(&self, id: i64) -> DbResult<Option<Product>> {
        debug!(id = %id, "Fetching active product");

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1 AND is_deleted = 0");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists one page of active products ordered by id.
    ///
    /// ## Arguments
    /// * `page` - 1-based page number
    /// * `page_size` - Rows per page
    pub async fn list_active(&self, page: i64, page_size: i64) -> DbResult<Vec<Product>> {
        debug!(page = %page, page_size = %page_size, "Listing products");

        let offset = page_offset(page, page_size)
            .ok_or_else(|| DbError::QueryFailed(format!("page {page} is out of range")))?;
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_deleted = 0 ORDER BY id LIMIT ?1 OFFSET ?2"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(page_size)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Counts active products.
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_deleted = 0")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Counts all products, deleted ones included.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Inserts a new product. `input.id` is ignored; the store assigns ids.
    pub async fn insert(&self, input: &ProductInput) -> DbResult<Product> {
        debug!(english_name = %input.english_name, price = %input.price, "Inserting product");

        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO products (english_name, arabic_name, price_cents, is_deleted, created_at, updated_at)
            VALUES (?1, ?2, ?3, 0, ?4, ?4)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(input.english_name.trim())
            .bind(input.arabic_name.trim())
            .bind(input.price.cents())
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(product)
    }

    /// Updates names and price of an active product.
    ///
    /// ## Returns
    /// `None` when no active product has `input.id`.
    pub async fn update(&self, input: &ProductInput) -> DbResult<Option<Product>> {
        debug!(id = %input.id, "Updating product");

        let sql = format!(
            r#"
            UPDATE products SET
                english_name = ?2,
                arabic_name = ?3,
                price_cents = ?4,
                updated_at = ?5
            WHERE id = ?1 AND is_deleted = 0
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(input.id)
            .bind(input.english_name.trim())
            .bind(input.arabic_name.trim())
            .bind(input.price.cents())
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Soft-deletes an active product.
    ///
    /// ## Returns
    /// `false` when the product does not exist or is already deleted.
    pub async fn soft_delete(&self, id: i64) -> DbResult<bool> {
        debug!(id = %id, "Soft-deleting product");

        let result = sqlx::query(
            "UPDATE products SET is_deleted = 1, updated_at = ?2 WHERE id = ?1 AND is_deleted = 0",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Catalog Snapshot (transaction-scoped)
// =============================================================================

#[derive(sqlx::FromRow)]
struct CatalogRow {
    id: i64,
    english_name: String,
    price_cents: i64,
}

/// Loads the catalog entries for `product_ids` on an open connection or
/// transaction, soft-deleted products included.
///
/// Ids that do not exist are simply absent from the map; the pricer turns
/// them into `ProductNotFound`.
pub async fn load_catalog(
    conn: &mut SqliteConnection,
    product_ids: &[i64],
) -> DbResult<HashMap<i64, CatalogEntry>> {
    let mut ids: Vec<i64> = product_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    debug!(count = ids.len(), "Loading catalog snapshot");

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id, english_name, price_cents FROM products WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in &ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let rows: Vec<CatalogRow> = builder.build_query_as().fetch_all(&mut *conn).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            (
                row.id,
                CatalogEntry {
                    product_id: row.id,
                    unit_price: Money::from_cents(row.price_cents),
                    display_name: row.english_name,
                },
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn input(name: &str, cents: i64) -> ProductInput {
        ProductInput {
            id: 0,
            english_name: name.to_string(),
            arabic_name: format!("{name} بالعربية"),
            price: Money::from_cents(cents),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = repo.insert(&input("  Laptop ", 150_000)).await.unwrap();
        assert!(product.id > 0);
        assert_eq!(product.english_name, "Laptop");
        assert_eq!(product.price(), Money::from_cents(150_000));
        assert!(!product.is_deleted);

        let fetched = repo.get_active(product.id).await.unwrap().unwrap();
        assert_eq!(fetched, product);
    }

    #[tokio::test]
    async fn test_list_active_paginates_and_skips_deleted() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let mut ids = Vec::new();
        for i in 1..=5 {
            ids.push(repo.insert(&input(&format!("P{i}"), 100 * i)).await.unwrap().id);
        }
        assert!(repo.soft_delete(ids[1]).await.unwrap());

        assert_eq!(repo.count_active().await.unwrap(), 4);
        assert_eq!(repo.count().await.unwrap(), 5);

        let first = repo.list_active(1, 3).await.unwrap();
        let second = repo.list_active(2, 3).await.unwrap();
        assert_eq!(
            first.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![ids[0], ids[2], ids[3]]
        );
        assert_eq!(second.iter().map(|p| p.id).collect::<Vec<_>>(), vec![ids[4]]);
    }

    #[tokio::test]
    async fn test_update_only_active() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = repo.insert(&input("Mouse", 2550)).await.unwrap();
        let mut change = input("Wireless Mouse", 3000);
        change.id = product.id;

        let updated = repo.update(&change).await.unwrap().unwrap();
        assert_eq!(updated.english_name, "Wireless Mouse");
        assert_eq!(updated.price_cents, 3000);
        assert_eq!(updated.created_at, product.created_at);

        assert!(repo.soft_delete(product.id).await.unwrap());
        assert!(repo.update(&change).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_soft_delete_keeps_row() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = repo.insert(&input("Keyboard", 5000)).await.unwrap();
        assert!(repo.soft_delete(product.id).await.unwrap());
        assert!(!repo.soft_delete(product.id).await.unwrap());
        assert!(!repo.soft_delete(9999).await.unwrap());

        assert!(repo.get_active(product.id).await.unwrap().is_none());
        let row = repo.get_by_id(product.id).await.unwrap().unwrap();
        assert!(row.is_deleted);
    }

    #[tokio::test]
    async fn test_load_catalog_includes_deleted() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let a = repo.insert(&input("A", 100)).await.unwrap();
        let b = repo.insert(&input("B", 200)).await.unwrap();
        repo.soft_delete(b.id).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        let catalog = load_catalog(&mut conn, &[a.id, b.id, b.id, 404]).await.unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[&b.id].unit_price, Money::from_cents(200));
        assert_eq!(catalog[&a.id].display_name, "A");
        assert!(!catalog.contains_key(&404));
    }
}
