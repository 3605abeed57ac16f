//! Document metadata repository implementation.
//!
//! Binary payloads live in blob storage (see [`crate::file_storage`]);
//! this repository owns only the metadata rows. List filters combine
//! with AND semantics and every query is scoped to the owning user.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use docuflow_core::{
    normalize_tags, validate_tag, CreateDocumentRequest, Document, DocumentRepository, Error,
    ListDocumentsRequest, Result, UpdateDocumentRequest,
};

use crate::escape_like;

/// Map a category FK violation onto the same 400 the handler's existence
/// check produces, so a category deleted concurrently with an insert or
/// update does not surface as an internal error.
fn map_category_fk_error(err: sqlx::Error) -> Error {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.message().contains("document_category_id_fkey") {
            return Error::InvalidInput("Category not found".to_string());
        }
    }
    Error::Database(err)
}

/// Validate a normalized tag list for storage.
fn validate_tags(tags: &[String]) -> Result<()> {
    for tag in tags {
        validate_tag(tag).map_err(Error::InvalidInput)?;
    }
    Ok(())
}

/// Validate a document title: non-empty after trimming, bounded length.
pub fn validate_title(title: &str) -> std::result::Result<(), String> {
    if title.is_empty() {
        return Err("Title cannot be empty".to_string());
    }
    if title.len() > 500 {
        return Err("Title must be 500 characters or less".to_string());
    }
    Ok(())
}

/// PostgreSQL implementation of DocumentRepository.
pub struct PgDocumentRepository {
    pool: Pool<Postgres>,
}

impl PgDocumentRepository {
    /// Create a new PgDocumentRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

const DOCUMENT_COLUMNS: &str = "id, user_id, title, file_name, file_type, file_size, \
     content_hash, storage_path, category_id, tags, uploaded_at";

fn document_from_row(row: &PgRow) -> Document {
    Document {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        file_name: row.get("file_name"),
        file_type: row.get("file_type"),
        file_size: row.get("file_size"),
        content_hash: row.get("content_hash"),
        storage_path: row.get("storage_path"),
        category_id: row.get("category_id"),
        tags: row.get("tags"),
        uploaded_at: row.get("uploaded_at"),
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn insert(&self, req: CreateDocumentRequest) -> Result<Document> {
        let title = req.title.trim();
        validate_title(title).map_err(Error::InvalidInput)?;

        let id = Uuid::now_v7();
        let now = Utc::now();
        let tags = normalize_tags(&req.tags);
        validate_tags(&tags)?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO document
                (id, user_id, title, file_name, file_type, file_size,
                 content_hash, storage_path, category_id, tags, uploaded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(req.user_id)
        .bind(title)
        .bind(&req.file_name)
        .bind(&req.file_type)
        .bind(req.file_size)
        .bind(&req.content_hash)
        .bind(&req.storage_path)
        .bind(req.category_id)
        .bind(&tags)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_category_fk_error)?;

        debug!(
            subsystem = "database",
            component = "documents",
            op = "insert",
            document_id = %id,
            user_id = %req.user_id,
            file_size = req.file_size,
            "Inserted document metadata"
        );

        Ok(document_from_row(&row))
    }

    async fn list(&self, user_id: Uuid, req: ListDocumentsRequest) -> Result<Vec<Document>> {
        // The search term matches title, original file name, or any tag,
        // case-insensitively, and combines with the category filter (AND).
        let pattern = req
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let rows = sqlx::query(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS}
            FROM document
            WHERE user_id = $1
              AND ($2::uuid IS NULL OR category_id = $2)
              AND ($3::text IS NULL
                   OR title ILIKE $3
                   OR file_name ILIKE $3
                   OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE $3))
            ORDER BY uploaded_at DESC
            "#
        ))
        .bind(user_id)
        .bind(req.category_id)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(document_from_row).collect())
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Document>> {
        let row = sqlx::query(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM document WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(document_from_row))
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: UpdateDocumentRequest,
    ) -> Result<Document> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM document WHERE id = $1 AND user_id = $2 FOR UPDATE"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .map(|row| document_from_row(&row))
        .ok_or(Error::DocumentNotFound(id))?;

        // Absent fields keep their current value; category_id distinguishes
        // "absent" (preserve) from "null" (clear to uncategorized).
        let title = match req.title {
            Some(t) => {
                let t = t.trim().to_string();
                validate_title(&t).map_err(Error::InvalidInput)?;
                t
            }
            None => existing.title,
        };
        let category_id = match req.category_id {
            Some(patch) => patch,
            None => existing.category_id,
        };
        let tags = match req.tags {
            Some(tags) => {
                let tags = normalize_tags(&tags);
                validate_tags(&tags)?;
                tags
            }
            None => existing.tags,
        };

        let row = sqlx::query(&format!(
            r#"
            UPDATE document
            SET title = $3, category_id = $4, tags = $5
            WHERE id = $1 AND user_id = $2
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(&title)
        .bind(category_id)
        .bind(&tags)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_category_fk_error)?;

        tx.commit().await?;

        Ok(document_from_row(&row))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<Document> {
        let row = sqlx::query(&format!(
            "DELETE FROM document WHERE id = $1 AND user_id = $2 RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .map(|row| document_from_row(&row))
        .ok_or(Error::DocumentNotFound(id))?;

        debug!(
            subsystem = "database",
            component = "documents",
            op = "delete",
            document_id = %id,
            user_id = %user_id,
            "Deleted document metadata"
        );

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Quarterly report").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title(&"x".repeat(501)).is_err());
    }
}
