//! Category repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use uuid::Uuid;

use docuflow_core::{Category, CategoryRepository, Error, Result};

/// Validate a category name: non-empty after trimming, bounded length.
pub fn validate_category_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Category name cannot be empty".to_string());
    }
    if name.len() > 100 {
        return Err("Category name must be 100 characters or less".to_string());
    }
    Ok(())
}

/// PostgreSQL implementation of CategoryRepository.
pub struct PgCategoryRepository {
    pool: Pool<Postgres>,
}

impl PgCategoryRepository {
    /// Create a new PgCategoryRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn category_from_row(row: &PgRow) -> Category {
    Category {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn insert(&self, user_id: Uuid, name: &str) -> Result<Category> {
        let name = name.trim();
        validate_category_name(name).map_err(Error::InvalidInput)?;

        let id = Uuid::now_v7();
        let now = Utc::now();

        let row = sqlx::query(
            r#"
            INSERT INTO category (id, user_id, name, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(name)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(ref db_err) = err {
                if db_err.message().contains("idx_unique_category_name") {
                    return Error::Conflict(
                        "A category with this name already exists".to_string(),
                    );
                }
            }
            Error::Database(err)
        })?;

        Ok(category_from_row(&row))
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, user_id, name, created_at
             FROM category WHERE user_id = $1
             ORDER BY lower(name)",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Category>> {
        let row = sqlx::query(
            "SELECT id, user_id, name, created_at
             FROM category WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(category_from_row))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        // The document FK is ON DELETE SET NULL, so documents referencing
        // this category are demoted to uncategorized, never blocking.
        let result = sqlx::query("DELETE FROM category WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::CategoryNotFound(id));
        }
        Ok(())
    }
}
