//! Product Repository Implementation
//!
//! PostgreSQL implementation of the ProductRepository trait.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Brand, NewProduct, Product, ProductRepository, Size};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

const PRODUCT_COLUMNS: &str = "id, article, name, brand, price, quantity, size, version, \
     created_by, last_modified_by, created_at, updated_at";

/// Database row representation matching the products table schema.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    article: i64,
    name: String,
    brand: String,
    price: Decimal,
    quantity: i64,
    size: String,
    version: i64,
    created_by: String,
    last_modified_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    /// Convert database row to domain Product entity.
    fn into_product(self) -> Result<Product, AppError> {
        let brand: Brand = self.brand.parse().map_err(|_| {
            AppError::Internal(format!("Unknown brand '{}' stored for product {}", self.brand, self.id))
        })?;
        let size: Size = self.size.parse().map_err(|_| {
            AppError::Internal(format!("Unknown size '{}' stored for product {}", self.size, self.id))
        })?;

        Ok(Product {
            id: self.id,
            article: self.article,
            name: self.name,
            brand,
            price: self.price,
            quantity: self.quantity,
            size,
            version: self.version,
            created_by: self.created_by,
            last_modified_by: self.last_modified_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, AppError> {
    rows.into_iter().map(ProductRow::into_product).collect()
}

/// PostgreSQL product repository implementation.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new PgProductRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_name_or_brand(
        &self,
        name: Option<String>,
        brand: Option<Brand>,
    ) -> Result<Vec<Product>, AppError> {
        let started = Instant::now();
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1::TEXT IS NOT NULL AND name = $1)
               OR ($2::TEXT IS NOT NULL AND brand = $2)
            ORDER BY article, size
            "#
        ))
        .bind(name)
        .bind(brand.map(|b| b.as_str()))
        .fetch_all(&self.pool)
        .await?;
        metrics::record_db_query("select", "products", started.elapsed().as_secs_f64());

        into_products(rows)
    }

    async fn find_all(&self) -> Result<Vec<Product>, AppError> {
        let started = Instant::now();
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY article, size"
        ))
        .fetch_all(&self.pool)
        .await?;
        metrics::record_db_query("select", "products", started.elapsed().as_secs_f64());

        into_products(rows)
    }

    async fn find_with_quantity_at_most(&self, limit: i64) -> Result<Vec<Product>, AppError> {
        let started = Instant::now();
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE quantity <= $1
            ORDER BY quantity, article
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        metrics::record_db_query("select", "products", started.elapsed().as_secs_f64());

        into_products(rows)
    }

    async fn insert_many(&self, products: &[NewProduct]) -> Result<Vec<Product>, AppError> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(products.len());

        for product in products {
            let row = sqlx::query_as::<_, ProductRow>(&format!(
                r#"
                INSERT INTO products
                    (id, article, name, brand, price, quantity, size, created_by, last_modified_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
                RETURNING {PRODUCT_COLUMNS}
                "#
            ))
            .bind(Uuid::now_v7())
            .bind(product.article)
            .bind(&product.name)
            .bind(product.brand.as_str())
            .bind(product.price)
            .bind(product.quantity)
            .bind(product.size.as_str())
            .bind(&product.created_by)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    AppError::Conflict(format!(
                        "Product with article {} and size {} already exists",
                        product.article, product.size
                    ))
                }
                _ => AppError::Database(e),
            })?;

            created.push(row.into_product()?);
        }

        tx.commit().await?;
        metrics::record_db_query("insert", "products", started.elapsed().as_secs_f64());

        Ok(created)
    }

    async fn increment_quantity(
        &self,
        article: i64,
        size: Size,
        delta: i64,
        modified_by: &str,
    ) -> Result<Option<Product>, AppError> {
        let started = Instant::now();
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET quantity = quantity + $3,
                version = version + 1,
                last_modified_by = $4,
                updated_at = NOW()
            WHERE article = $1
              AND size = $2
              AND $3 >= -quantity
              AND $3 <= 9223372036854775807 - quantity
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(article)
        .bind(size.as_str())
        .bind(delta)
        .bind(modified_by)
        .fetch_optional(&self.pool)
        .await?;
        metrics::record_db_query("update", "products", started.elapsed().as_secs_f64());

        row.map(ProductRow::into_product).transpose()
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM products")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
