//! # Invoice Repository
//!
//! Row-level database operations for invoices and their line items.
//!
//! ## Two Kinds of Methods
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Pool-backed reads (&self)          Connection-scoped writes (assoc fn) │
//! │  ─────────────────────────          ───────────────────────────────────  │
//! │  get_with_names(id)                 fetch_header(conn, id)              │
//! │  get_without_names(id)              insert_invoice(conn, draft)         │
//! │  list_all()                         insert_items(conn, id, lines)       │
//! │                                     delete_items(conn, id)              │
//! │                                     update_total(conn, id, total, ver)  │
//! │                                                                         │
//! │  The write helpers take `&mut SqliteConnection` so the invoice service  │
//! │  can run several of them inside one transaction.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing never happens here: every value written comes from an
//! [`InvoiceDraft`] already built by `storefront_core::pricing`.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::debug;

use crate::error::DbResult;
use storefront_core::{Invoice, InvoiceDraft, LineItem, Money, PricedLine};

const HEADER_COLUMNS: &str = "id, user_id, created_at, total_cents, version";

/// An invoice row without its line items.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct InvoiceHeader {
    pub id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub total_cents: i64,
    pub version: i64,
}

impl InvoiceHeader {
    fn with_items(self, items: Vec<LineItem>) -> Invoice {
        Invoice {
            id: self.id,
            user_id: self.user_id,
            created_at: self.created_at,
            total_cents: self.total_cents,
            version: self.version,
            items,
        }
    }
}

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetches an invoice with its line items, each joined to the product's
    /// English name.
    pub async fn get_with_names(&self, id: i64) -> DbResult<Option<Invoice>> {
        debug!(id = %id, "Fetching invoice with product names");

        let mut conn = self.pool.acquire().await?;
        let Some(header) = Self::fetch_header(&mut conn, id).await? else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, LineItem>(
            r#"
            SELECT
                ii.id,
                ii.invoice_id,
                ii.product_id,
                ii.price_cents,
                ii.quantity,
                p.english_name AS product_name
            FROM invoice_items ii
            LEFT JOIN products p ON p.id = ii.product_id
            WHERE ii.invoice_id = ?1
            ORDER BY ii.id
            "#,
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(Some(header.with_items(items)))
    }

    /// Fetches an invoice with its line items, without product names.
    pub async fn get_without_names(&self, id: i64) -> DbResult<Option<Invoice>> {
        let mut conn = self.pool.acquire().await?;
        let Some(header) = Self::fetch_header(&mut conn, id).await? else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, LineItem>(
            r#"
            SELECT id, invoice_id, product_id, price_cents, quantity,
                   CAST(NULL AS TEXT) AS product_name
            FROM invoice_items
            WHERE invoice_id = ?1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(Some(header.with_items(items)))
    }

    /// Lists every invoice with its line items, ordered by id. Product names
    /// are not joined.
    pub async fn list_all(&self) -> DbResult<Vec<Invoice>> {
        debug!("Listing all invoices");

        let mut conn = self.pool.acquire().await?;

        let sql = format!("SELECT {HEADER_COLUMNS} FROM invoices ORDER BY id");
        let headers = sqlx::query_as::<_, InvoiceHeader>(&sql)
            .fetch_all(&mut *conn)
            .await?;

        let items = sqlx::query_as::<_, LineItem>(
            r#"
            SELECT id, invoice_id, product_id, price_cents, quantity,
                   CAST(NULL AS TEXT) AS product_name
            FROM invoice_items
            ORDER BY invoice_id, id
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        let mut by_invoice: HashMap<i64, Vec<LineItem>> = HashMap::new();
        for item in items {
            by_invoice.entry(item.invoice_id).or_default().push(item);
        }

        Ok(headers
            .into_iter()
            .map(|header| {
                let items = by_invoice.remove(&header.id).unwrap_or_default();
                header.with_items(items)
            })
            .collect())
    }

    /// Counts all invoices.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Connection-scoped operations (used inside transactions)
    // =========================================================================

    /// Fetches the invoice header on an open connection or transaction.
    pub async fn fetch_header(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> DbResult<Option<InvoiceHeader>> {
        let sql = format!("SELECT {HEADER_COLUMNS} FROM invoices WHERE id = ?1");
        let header = sqlx::query_as::<_, InvoiceHeader>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(header)
    }

    /// Inserts the invoice row for a draft and returns its id. Version
    /// starts at 1.
    pub async fn insert_invoice(conn: &mut SqliteConnection, draft: &InvoiceDraft) -> DbResult<i64> {
        debug!(user_id = %draft.user_id, total = %draft.total, "Inserting invoice");

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO invoices (user_id, created_at, total_cents, version)
            VALUES (?1, ?2, ?3, 1)
            RETURNING id
            "#,
        )
        .bind(draft.user_id)
        .bind(draft.created_at)
        .bind(draft.total.cents())
        .fetch_one(&mut *conn)
        .await?;

        Ok(id)
    }

    /// Inserts priced lines for an invoice.
    ///
    /// ## Snapshot Pattern
    /// The unit price was copied from the product when the line was priced.
    /// This preserves invoice history even if the product changes later.
    pub async fn insert_items(
        conn: &mut SqliteConnection,
        invoice_id: i64,
        lines: &[PricedLine],
    ) -> DbResult<()> {
        debug!(invoice_id = %invoice_id, count = lines.len(), "Inserting invoice items");

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (invoice_id, product_id, price_cents, quantity)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(invoice_id)
            .bind(line.product_id)
            .bind(line.unit_price.cents())
            .bind(line.quantity)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Deletes every line item of an invoice. Returns the number removed.
    pub async fn delete_items(conn: &mut SqliteConnection, invoice_id: i64) -> DbResult<u64> {
        debug!(invoice_id = %invoice_id, "Deleting invoice items");

        let result = sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?1")
            .bind(invoice_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Sets a new total and bumps the version, guarded by the version the
    /// caller read.
    ///
    /// ## Returns
    /// `false` when the stored version no longer equals `read_version`.
    pub async fn update_total(
        conn: &mut SqliteConnection,
        invoice_id: i64,
        total: Money,
        read_version: i64,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE invoices SET
                total_cents = ?2,
                version = version + 1
            WHERE id = ?1 AND version = ?3
            "#,
        )
        .bind(invoice_id)
        .bind(total.cents())
        .bind(read_version)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::user::NewUser;
    use crate::{Database, DbConfig};
    use storefront_core::{ProductInput, Role};

    async fn setup() -> (Database, i64, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db
            .users()
            .insert(&NewUser {
                full_name: "Owner".to_string(),
                email: "owner@example.com".to_string(),
                username: "owner".to_string(),
                password_hash: "hash".to_string(),
                role: Role::Visitor,
            })
            .await
            .unwrap();
        let product = db
            .products()
            .insert(&ProductInput {
                id: 0,
                english_name: "Laptop".to_string(),
                arabic_name: "لابتوب".to_string(),
                price: Money::from_cents(150_000),
            })
            .await
            .unwrap();
        (db, user.id, product.id)
    }

    fn draft(user_id: i64, product_id: i64, quantity: i64) -> InvoiceDraft {
        let unit_price = Money::from_cents(150_000);
        let subtotal = unit_price.checked_mul_quantity(quantity).unwrap();
        InvoiceDraft {
            user_id,
            created_at: Utc::now(),
            total: subtotal,
            lines: vec![PricedLine {
                product_id,
                unit_price,
                quantity,
                subtotal,
            }],
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let (db, user_id, product_id) = setup().await;
        let repo = db.invoices();

        let mut tx = db.pool().begin().await.unwrap();
        let candidate = draft(user_id, product_id, 2);
        let id = InvoiceRepository::insert_invoice(&mut tx, &candidate).await.unwrap();
        InvoiceRepository::insert_items(&mut tx, id, &candidate.lines).await.unwrap();
        tx.commit().await.unwrap();

        let named = repo.get_with_names(id).await.unwrap().unwrap();
        assert_eq!(named.version, 1);
        assert_eq!(named.total_cents, 300_000);
        assert_eq!(named.items.len(), 1);
        assert_eq!(named.items[0].product_name.as_deref(), Some("Laptop"));

        let plain = repo.get_without_names(id).await.unwrap().unwrap();
        assert_eq!(plain.items[0].product_name, None);

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], plain);
    }

    #[tokio::test]
    async fn test_uncommitted_transaction_rolls_back() {
        let (db, user_id, product_id) = setup().await;

        {
            let mut tx = db.pool().begin().await.unwrap();
            let candidate = draft(user_id, product_id, 1);
            let id = InvoiceRepository::insert_invoice(&mut tx, &candidate).await.unwrap();
            InvoiceRepository::insert_items(&mut tx, id, &candidate.lines).await.unwrap();
            // dropped without commit
        }

        assert_eq!(db.invoices().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_total_checks_version() {
        let (db, user_id, product_id) = setup().await;

        let mut tx = db.pool().begin().await.unwrap();
        let candidate = draft(user_id, product_id, 1);
        let id = InvoiceRepository::insert_invoice(&mut tx, &candidate).await.unwrap();
        InvoiceRepository::insert_items(&mut tx, id, &candidate.lines).await.unwrap();

        assert!(!InvoiceRepository::update_total(&mut tx, id, Money::from_cents(1), 7)
            .await
            .unwrap());
        assert!(InvoiceRepository::update_total(&mut tx, id, Money::from_cents(1), 1)
            .await
            .unwrap());
        assert_eq!(InvoiceRepository::delete_items(&mut tx, id).await.unwrap(), 1);
        tx.commit().await.unwrap();

        let header = db.invoices().get_without_names(id).await.unwrap().unwrap();
        assert_eq!(header.version, 2);
        assert_eq!(header.total_cents, 1);
        assert!(header.items.is_empty());
    }

    #[tokio::test]
    async fn test_missing_invoice() {
        let (db, _, _) = setup().await;
        assert!(db.invoices().get_with_names(42).await.unwrap().is_none());
        assert!(db.invoices().list_all().await.unwrap().is_empty());
    }
}
