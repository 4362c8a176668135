//! # Catalog Management
//!
//! Paginated listing, lookup, create-or-update and soft delete of products.
//!
//! ```text
//! create_or_update(input)
//!      │
//!      ├── validate_product ── violations ──► ValidationFailed
//!      │
//!      ├── input.id > 0 and active row exists ──► UPDATE ──► Updated(product)
//!      │
//!      └── otherwise ────────────────────────────► INSERT ──► Created(product)
//! ```

use tracing::info;

use crate::error::ServiceResult;
use crate::pool::Database;
use storefront_core::validation::{validate_pagination, validate_product};
use storefront_core::{CoreError, Page, Product, ProductInput, Upsert};

#[derive(Debug, Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        CatalogService { db }
    }

    /// Lists one page of active products.
    ///
    /// ## Errors
    /// `ValidationFailed` unless `page >= 1` and `1 <= page_size <= 100`.
    pub async fn list(&self, page: i64, page_size: i64) -> ServiceResult<Page<Product>> {
        let violations = validate_pagination(page, page_size);
        if !violations.is_empty() {
            return Err(CoreError::ValidationFailed(violations).into());
        }

        let products = self.db.products();
        let total_items = products.count_active().await?;
        let items = products.list_active(page, page_size).await?;

        Ok(Page {
            items,
            total_items,
            page,
            page_size,
        })
    }

    /// Gets an active product. Soft-deleted products are not found here.
    pub async fn get(&self, id: i64) -> ServiceResult<Option<Product>> {
        Ok(self.db.products().get_active(id).await?)
    }

    /// Creates a product, or updates it when `input.id` names an active one.
    pub async fn create_or_update(&self, input: &ProductInput) -> ServiceResult<Upsert<Product>> {
        let violations = validate_product(input);
        if !violations.is_empty() {
            return Err(CoreError::ValidationFailed(violations).into());
        }

        let products = self.db.products();

        if input.id > 0 {
            if let Some(updated) = products.update(input).await? {
                info!(id = %updated.id, "Product updated");
                return Ok(Upsert::Updated(updated));
            }
        }

        let created = products.insert(input).await?;
        info!(id = %created.id, "Product created");
        Ok(Upsert::Created(created))
    }

    /// Soft-deletes a product. Returns `false` when there was nothing to
    /// delete.
    pub async fn delete(&self, id: i64) -> ServiceResult<bool> {
        let deleted = self.db.products().soft_delete(id).await?;
        if deleted {
            info!(id = %id, "Product deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::DbConfig;
    use storefront_core::Money;

    fn input(id: i64, name: &str, cents: i64) -> ProductInput {
        ProductInput {
            id,
            english_name: name.to_string(),
            arabic_name: "منتج".to_string(),
            price: Money::from_cents(cents),
        }
    }

    async fn service() -> CatalogService {
        CatalogService::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    #[tokio::test]
    async fn test_create_then_update() {
        let catalog = service().await;

        let created = catalog.create_or_update(&input(0, "Laptop", 150_000)).await.unwrap();
        assert!(created.is_created());
        let product = created.into_inner();

        let updated = catalog
            .create_or_update(&input(product.id, "Laptop Pro", 175_000))
            .await
            .unwrap();
        assert!(!updated.is_created());
        let product = updated.into_inner();
        assert_eq!(product.english_name, "Laptop Pro");
        assert_eq!(product.price_cents, 175_000);
    }

    #[tokio::test]
    async fn test_unknown_id_creates() {
        let catalog = service().await;
        let outcome = catalog.create_or_update(&input(500, "Mouse", 2550)).await.unwrap();
        assert!(outcome.is_created());
        assert_ne!(outcome.into_inner().id, 0);
    }

    #[tokio::test]
    async fn test_invalid_product_reports_all() {
        let catalog = service().await;
        let bad = ProductInput {
            id: 0,
            english_name: " ".to_string(),
            arabic_name: "ا".repeat(201),
            price: Money::from_cents(100_000_000),
        };

        match catalog.create_or_update(&bad).await {
            Err(ServiceError::Core(err)) => assert_eq!(
                err.messages(),
                vec![
                    "Arabic name must not exceed 200 characters.".to_string(),
                    "English name is required.".to_string(),
                    "Price must not exceed 999,999.99.".to_string(),
                ]
            ),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let catalog = service().await;
        for i in 1..=3 {
            catalog
                .create_or_update(&input(0, &format!("P{i}"), 100))
                .await
                .unwrap();
        }

        let page = catalog.list(1, 2).await.unwrap();
        assert_eq!(page.total_items, 3);
        assert_eq!(page.items.len(), 2);

        let first_id = page.items[0].id;
        assert!(catalog.delete(first_id).await.unwrap());
        assert!(!catalog.delete(first_id).await.unwrap());
        assert!(catalog.get(first_id).await.unwrap().is_none());

        let page = catalog.list(1, 10).await.unwrap();
        assert_eq!(page.total_items, 2);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_paging() {
        let catalog = service().await;
        assert!(catalog.list(0, 10).await.is_err());
        assert!(catalog.list(1, 0).await.is_err());
        assert!(catalog.list(1, 101).await.is_err());
    }

    #[tokio::test]
    async fn test_list_rejects_page_past_offset_range() {
        let catalog = service().await;
        match catalog.list(i64::MAX / 10, 100).await {
            Err(ServiceError::Core(err)) => assert_eq!(
                err.messages(),
                vec![format!("Page must not exceed {}.", i64::MAX / 100)]
            ),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }
}
