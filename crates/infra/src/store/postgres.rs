//! Postgres-backed product store.
//!
//! ## Schema
//!
//! One `products` table. `seq` is a BIGSERIAL that records insertion order and
//! serves as the natural order of the collection; `name` carries a UNIQUE
//! constraint, which is how name uniqueness is enforced for this backend.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / RowNotFound / Other | N/A | `Backend` |

use std::sync::Arc;

use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::instrument;
use uuid::Uuid;

use stockroom_products::{
    NewProduct, Product, ProductId, ProductPatch, ProductQuery, SortField, SortSpec,
};

use super::r#trait::{ProductStore, StoreError};

const CREATE_PRODUCTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    seq      BIGSERIAL        NOT NULL,
    id       UUID             PRIMARY KEY,
    name     TEXT             NOT NULL UNIQUE,
    price    DOUBLE PRECISION NOT NULL,
    weight   DOUBLE PRECISION NOT NULL,
    quantity DOUBLE PRECISION NOT NULL DEFAULT 0
)
"#;

const PRODUCT_COLUMNS: &str = "id, name, price, weight, quantity";

/// Postgres-backed product store.
///
/// `Send + Sync`; all operations go through the SQLx connection pool.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `products` table if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_PRODUCTS_TABLE)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self), err)]
    async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        let rows = select_products(query)
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_products", e))?;

        rows.iter().map(row_to_product).collect()
    }

    #[instrument(skip(self, product), fields(name = %product.name), err)]
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let id = ProductId::new();

        sqlx::query("INSERT INTO products (id, name, price, weight, quantity) VALUES ($1, $2, $3, $4, $5)")
            .bind(id.as_uuid())
            .bind(&product.name)
            .bind(product.price)
            .bind(product.weight)
            .bind(product.quantity)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_write_error("insert_product", &product.name, e))?;

        Ok(Product::new(id, product))
    }

    #[instrument(skip(self, patch), fields(product_id = %id), err)]
    async fn update(&self, id: ProductId, patch: &ProductPatch) -> Result<Option<Product>, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_update", e))?;

        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("load_for_update", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut product = row_to_product(&row)?;
        product.apply(patch)?;

        sqlx::query("UPDATE products SET name = $2, price = $3, weight = $4, quantity = $5 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(product.name())
            .bind(product.price())
            .bind(product.weight())
            .bind(product.quantity())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error("update_product", product.name(), e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_update", e))?;

        Ok(Some(product))
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!(
            "DELETE FROM products WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_product", e))?;

        row.as_ref().map(row_to_product).transpose()
    }
}

/// Build the list query. Every client value is bound; only allow-listed column
/// names are pushed as SQL text.
fn select_products(query: &ProductQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE TRUE"));

    if let Some(needle) = query.name() {
        qb.push(" AND name ILIKE ")
            .push_bind(format!("%{}%", escape_like(needle)));
    }
    if let Some(min) = query.min_price() {
        qb.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = query.max_price() {
        qb.push(" AND price <= ").push_bind(max);
    }

    qb.push(" ORDER BY ");
    if let Some(SortSpec { field, order }) = query.sort() {
        qb.push(order_column(field))
            .push(if order.is_desc() { " DESC, " } else { " ASC, " });
    }
    qb.push("seq ASC");
    qb
}

/// Names sort bytewise, matching the in-memory store.
fn order_column(field: SortField) -> &'static str {
    match field {
        SortField::Name => "name COLLATE \"C\"",
        SortField::Price => "price",
        SortField::Weight => "weight",
        SortField::Quantity => "quantity",
    }
}

/// Escape LIKE metacharacters so the needle matches literally.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn row_to_product(row: &PgRow) -> Result<Product, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode_product", e);

    let id: Uuid = row.try_get("id").map_err(decode)?;
    let fields = NewProduct {
        name: row.try_get("name").map_err(decode)?,
        price: row.try_get("price").map_err(decode)?,
        weight: row.try_get("weight").map_err(decode)?,
        quantity: row.try_get("quantity").map_err(decode)?,
    };
    Ok(Product::new(ProductId::from_uuid(id), fields))
}

fn map_write_error(operation: &str, name: &str, err: sqlx::Error) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::Duplicate(name.to_string())
    } else {
        map_sqlx_error(operation, err)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::Backend(format!("database error in {}: {}", operation, db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_products::SortOrder;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("wid"), "wid");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn empty_query_orders_by_insertion() {
        let qb = select_products(&ProductQuery::all());
        assert_eq!(
            qb.sql(),
            "SELECT id, name, price, weight, quantity FROM products WHERE TRUE ORDER BY seq ASC"
        );
    }

    #[test]
    fn filters_are_bound_not_inlined() {
        let query = ProductQuery::all()
            .with_name("wid'; drop table products; --")
            .with_min_price(10.0)
            .with_max_price(20.0)
            .sorted_by(SortField::Price, SortOrder::Desc);
        let qb = select_products(&query);
        let sql = qb.sql();

        assert!(!sql.contains("drop table"));
        assert!(sql.contains("name ILIKE $1"));
        assert!(sql.contains("price >= $2"));
        assert!(sql.contains("price <= $3"));
        assert!(sql.ends_with("ORDER BY price DESC, seq ASC"));
    }

    #[test]
    fn name_sort_uses_bytewise_collation() {
        let query = ProductQuery::all().sorted_by(SortField::Name, SortOrder::Asc);
        assert!(select_products(&query).sql().ends_with("ORDER BY name COLLATE \"C\" ASC, seq ASC"));
    }

    /// Requires a scratch database: `DATABASE_URL=postgres://... cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn round_trip_against_postgres() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let store = PostgresProductStore::connect(&url).await.unwrap();
        store.migrate().await.unwrap();

        let name = format!("widget-{}", ProductId::new());
        let created = store
            .insert(NewProduct {
                name: name.clone(),
                price: 10.0,
                weight: 1.0,
                quantity: 2.0,
            })
            .await
            .unwrap();

        let dup = store
            .insert(NewProduct {
                name: name.clone(),
                price: 1.0,
                weight: 1.0,
                quantity: 0.0,
            })
            .await
            .unwrap_err();
        assert!(matches!(dup, StoreError::Duplicate(_)));

        let patch = ProductPatch {
            quantity: Some(5.0),
            ..ProductPatch::default()
        };
        let updated = store.update(created.id(), &patch).await.unwrap().unwrap();
        assert_eq!(updated.quantity(), 5.0);

        let deleted = store.delete(created.id()).await.unwrap();
        assert_eq!(deleted, Some(updated));
        assert_eq!(store.delete(created.id()).await.unwrap(), None);
    }
}
