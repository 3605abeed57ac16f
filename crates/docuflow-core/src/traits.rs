//! Core traits for DocuFlow abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// USER / SESSION REPOSITORY TRAITS
// =============================================================================

/// Request for creating a new user account.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    /// Already-hashed credential (PHC string). Hashing happens above the
    /// repository so the database layer never sees cleartext passwords.
    pub password_hash: String,
}

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `Error::Conflict` on duplicate
    /// email or username.
    async fn insert(&self, req: CreateUserRequest) -> Result<User>;

    /// Look up a user by email (login path).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Look up a user by username (registration uniqueness check).
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Look up a user by id (token validation path).
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
}

/// Repository for bearer-token sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a session for `user_id` keyed by the token digest.
    async fn create(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session>;

    /// Resolve a token digest to its owning user, rejecting expired
    /// sessions. Returns `None` for unknown or expired tokens.
    async fn find_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>>;

    /// Remove sessions whose expiry has passed. Returns the number removed.
    async fn delete_expired(&self) -> Result<u64>;
}

// =============================================================================
// CATEGORY REPOSITORY TRAIT
// =============================================================================

/// Repository for per-user document categories.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a category. Fails with `Error::Conflict` when the user
    /// already has a category with this name.
    async fn insert(&self, user_id: Uuid, name: &str) -> Result<Category>;

    /// List the user's categories, ordered by name.
    async fn list(&self, user_id: Uuid) -> Result<Vec<Category>>;

    /// Fetch a single category scoped to its owner.
    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Category>>;

    /// Delete a category. Documents referencing it become uncategorized
    /// (FK `ON DELETE SET NULL`); the delete is never blocked by them.
    /// Fails with `Error::CategoryNotFound` if absent.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()>;
}

// =============================================================================
// DOCUMENT REPOSITORY TRAIT
// =============================================================================

/// Request for inserting an uploaded document's metadata row.
#[derive(Debug, Clone)]
pub struct CreateDocumentRequest {
    pub user_id: Uuid,
    pub title: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub content_hash: String,
    pub storage_path: String,
    pub category_id: Option<Uuid>,
    pub tags: Vec<String>,
}

/// Filters for listing documents. Filters combine with AND semantics and
/// are always scoped to the owning user.
#[derive(Debug, Clone, Default)]
pub struct ListDocumentsRequest {
    /// Restrict to a single category.
    pub category_id: Option<Uuid>,
    /// Case-insensitive substring match over title, file name, and tags.
    pub search: Option<String>,
}

/// Metadata update for a document. `None` fields are preserved; the
/// payload itself is immutable and never touched by updates.
#[derive(Debug, Clone, Default)]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    /// `None` preserves the current association; `Some(None)` clears it
    /// (uncategorized); `Some(Some(id))` re-associates.
    pub category_id: Option<Option<Uuid>>,
    /// Full replacement tag list when present.
    pub tags: Option<Vec<String>>,
}

impl UpdateDocumentRequest {
    /// Whether this update changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.category_id.is_none() && self.tags.is_none()
    }
}

/// Repository for document metadata.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert the metadata row for a freshly stored upload.
    async fn insert(&self, req: CreateDocumentRequest) -> Result<Document>;

    /// List the user's documents, newest first, applying `req` filters.
    async fn list(&self, user_id: Uuid, req: ListDocumentsRequest) -> Result<Vec<Document>>;

    /// Fetch a single document scoped to its owner.
    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Document>>;

    /// Apply a metadata update and return the resulting row.
    /// Fails with `Error::DocumentNotFound` if absent.
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: UpdateDocumentRequest,
    ) -> Result<Document>;

    /// Delete a document row, returning the removed row so the caller can
    /// clean up the stored blob. Fails with `Error::DocumentNotFound`.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<Document>;
}
