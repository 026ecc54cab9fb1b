//! SQLite-backed product repository.
//!
//! Ids are stored as hyphenated text. Writes run inside a transaction that is
//! committed before the call returns; an early return drops the transaction,
//! which rolls it back.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::pool::PoolConnection;
use sqlx::{Connection, QueryBuilder, Sqlite};

use catalog_core::ProductId;
use catalog_products::{Product, ProductPatch};

use super::{ListQuery, ProductRepository, RepoResult, RepositoryError};

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price: f64,
    stock: i64,
}

impl ProductRow {
    fn into_product(self) -> RepoResult<Product> {
        let id: ProductId = self
            .id
            .parse()
            .map_err(|e| RepositoryError::Corrupt(format!("{}: {e}", self.id)))?;
        Product::restore(id, self.name, self.price, self.stock)
            .map_err(|e| RepositoryError::Corrupt(format!("{id}: {e}")))
    }
}

/// Repository session bound to one pooled connection.
///
/// The connection goes back to the pool when the session is dropped, on every
/// exit path.
pub struct SqlProductRepository {
    conn: PoolConnection<Sqlite>,
}

impl SqlProductRepository {
    pub fn new(conn: PoolConnection<Sqlite>) -> Self {
        Self { conn }
    }
}

/// `%needle%` with LIKE wildcards in the needle escaped, so the search term is
/// matched literally.
fn like_pattern(q: &str) -> String {
    let mut out = String::with_capacity(q.len() + 2);
    out.push('%');
    for ch in q.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

#[async_trait]
impl ProductRepository for SqlProductRepository {
    async fn add(&mut self, product: &Product) -> RepoResult<()> {
        let now = Utc::now();
        let mut tx = Connection::begin(&mut *self.conn).await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO products (id, name, price, stock, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.id().to_string())
        .bind(product.name())
        .bind(product.price())
        .bind(product.stock())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(RepositoryError::Duplicate(product.id()));
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;
        tracing::debug!(product_id = %product.id(), "product inserted");
        Ok(())
    }

    async fn get(&mut self, id: ProductId) -> RepoResult<Option<Product>> {
        let row: Option<ProductRow> =
            sqlx::query_as("SELECT id, name, price, stock FROM products WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&mut *self.conn)
                .await?;

        row.map(ProductRow::into_product).transpose()
    }

    async fn list(&mut self, query: &ListQuery) -> RepoResult<Vec<Product>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, name, price, stock FROM products");

        if let Some(q) = &query.q {
            qb.push(" WHERE lower(name) LIKE ")
                .push_bind(like_pattern(q))
                .push(" ESCAPE '\\'");
        }

        // rowid keeps insertion order among equal timestamps.
        qb.push(" ORDER BY created_at DESC, rowid DESC");

        // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
        let limit = query.limit.map(i64::from).unwrap_or(-1);
        if limit >= 0 || query.offset > 0 {
            qb.push(" LIMIT ").push_bind(limit);
        }
        if query.offset > 0 {
            qb.push(" OFFSET ").push_bind(i64::try_from(query.offset).unwrap_or(i64::MAX));
        }

        let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(&mut *self.conn).await?;
        rows.into_iter().map(ProductRow::into_product).collect()
    }

    async fn update_partial(
        &mut self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> RepoResult<Option<Product>> {
        let mut tx = Connection::begin(&mut *self.conn).await?;

        let row: Option<ProductRow> =
            sqlx::query_as("SELECT id, name, price, stock FROM products WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&mut *tx)
                .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let updated = patch.apply(&row.into_product()?)?;

        sqlx::query(
            r#"
            UPDATE products
            SET name = ?, price = ?, stock = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(updated.name())
        .bind(updated.price())
        .bind(updated.stock())
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(product_id = %id, "product updated");
        Ok(Some(updated))
    }

    async fn delete(&mut self, id: ProductId) -> RepoResult<bool> {
        let mut tx = Connection::begin(&mut *self.conn).await?;

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        let removed = result.rows_affected() > 0;
        tracing::debug!(product_id = %id, removed, "product delete");
        Ok(removed)
    }
}
