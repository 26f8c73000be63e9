use async_trait::async_trait;
use chrono::{DateTime, Utc};
use emporium_core::ProductId;
use emporium_runtime::RepositoryError;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::ProductRepository;
use crate::models::{NewProduct, Product};

/// `PostgreSQL`-backed product repository.
#[derive(Debug, Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    product_id: i32,
    product_title: Option<String>,
    image_url: Option<String>,
    sku: Option<String>,
    price_unit: Option<Decimal>,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        if row.quantity < 0 {
            return Err(RepositoryError::DataCorruption(format!(
                "negative quantity {} for product {}",
                row.quantity, row.product_id
            )));
        }

        Ok(Self {
            id: ProductId::new(row.product_id),
            product_title: row.product_title,
            image_url: row.image_url,
            sku: row.sku,
            price_unit: row.price_unit,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const COLUMNS: &str =
    "product_id, product_title, image_url, sku, price_unit, quantity, created_at, updated_at";

fn collect(rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
    rows.into_iter().map(Product::try_from).collect()
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO products (product_title, image_url, sku, price_unit, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "
        ))
        .bind(product.product_title)
        .bind(product.image_url)
        .bind(product.sku)
        .bind(product.price_unit)
        .bind(product.quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        row.try_into()
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM products WHERE product_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM products ORDER BY product_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM products WHERE sku = $1 ORDER BY product_id"
        ))
        .bind(sku)
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn update(&self, product: Product) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE products
            SET product_title = $2, image_url = $3, sku = $4, price_unit = $5,
                quantity = $6, updated_at = NOW()
            WHERE product_id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(product.id)
        .bind(product.product_title)
        .bind(product.image_url)
        .bind(product.sku)
        .bind(product.price_unit)
        .bind(product.quantity)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
