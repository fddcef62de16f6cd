//! Category reads

use anyhow::{Context, Result};
use async_trait::async_trait;
use catalog_common::Category;
use sqlx::PgPool;
use uuid::Uuid;

use crate::ingest::CategoryStore;

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category::new(row.id, row.name)
    }
}

/// [`CategoryStore`] over the `categories` table
#[derive(Clone)]
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    #[tracing::instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list categories")?;

        Ok(rows.into_iter().map(Category::from).collect())
    }
}
