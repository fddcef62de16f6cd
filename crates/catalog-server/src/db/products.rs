//! Product inserts

use anyhow::Result;
use async_trait::async_trait;
use catalog_common::{CatalogItem, MediaDescriptor};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::DbError;
use crate::ingest::{CatalogStore, NewProduct};

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    title: String,
    category_id: Uuid,
    rate: f64,
    rating: f64,
    description: String,
    image_url: String,
    image_external_id: String,
    stock: i32,
    min_order_quantity: i32,
    is_active: bool,
    is_offer_of_day: bool,
    is_featured: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for CatalogItem {
    fn from(row: ProductRow) -> Self {
        CatalogItem {
            id: row.id,
            title: row.title,
            category_id: row.category_id,
            rate: row.rate,
            rating: row.rating,
            description: row.description,
            image: MediaDescriptor::new(row.image_url, row.image_external_id),
            stock: row.stock,
            min_order_quantity: row.min_order_quantity,
            is_active: row.is_active,
            is_offer_of_day: row.is_offer_of_day,
            is_featured: row.is_featured,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// [`CatalogStore`] over the `products` table
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    #[tracing::instrument(skip(self, product), fields(title = %product.title))]
    async fn insert_product(&self, product: NewProduct) -> Result<CatalogItem> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (
                title, category_id, rate, rating, description,
                image_url, image_external_id, stock, min_order_quantity,
                is_active, is_offer_of_day, is_featured
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, title, category_id, rate, rating, description,
                      image_url, image_external_id, stock, min_order_quantity,
                      is_active, is_offer_of_day, is_featured, created_at, updated_at
            "#,
        )
        .bind(&product.title)
        .bind(product.category_id)
        .bind(product.rate)
        .bind(product.rating)
        .bind(&product.description)
        .bind(&product.image.url)
        .bind(&product.image.external_id)
        .bind(product.stock)
        .bind(product.min_order_quantity)
        .bind(product.is_active)
        .bind(product.is_offer_of_day)
        .bind(product.is_featured)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Category deleted between snapshot and insert
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_foreign_key_violation() {
                    return DbError::not_found("Category", &product.category_id.to_string());
                }
            }
            DbError::from(e)
        })?;

        Ok(row.into())
    }
}
