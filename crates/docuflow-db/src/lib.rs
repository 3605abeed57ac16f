//! # docuflow-db
//!
//! PostgreSQL database layer for DocuFlow.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for users, sessions, categories, documents
//! - Filesystem blob storage for document payloads
//! - Embedded schema migrations
//!
//! ## Example
//!
//! ```rust,ignore
//! use docuflow_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/docuflow")
//!         .await?
//!         .with_filesystem_storage("/var/lib/docuflow/files");
//!
//!     let categories = db.categories.list(user_id).await?;
//!     Ok(())
//! }
//! ```

pub mod categories;
pub mod documents;
pub mod file_storage;
pub mod pool;
pub mod sessions;
pub mod users;

// Test fixtures for integration tests.
// Always compiled so integration tests (in tests/) can use them.
pub mod test_fixtures;

// Re-export core types
pub use docuflow_core::*;

// Re-export repository implementations
pub use categories::{validate_category_name, PgCategoryRepository};
pub use documents::{validate_title, PgDocumentRepository};
pub use file_storage::{
    compute_content_hash, generate_storage_path, DocumentStore, FilesystemBackend,
    StorageBackend,
};
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use sessions::PgSessionRepository;
pub use users::PgUserRepository;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// User account repository.
    pub users: PgUserRepository,
    /// Bearer-token session repository.
    pub sessions: PgSessionRepository,
    /// Category repository.
    pub categories: PgCategoryRepository,
    /// Document metadata repository.
    pub documents: PgDocumentRepository,
    /// Blob store for document payloads. Configure with
    /// [`Database::with_filesystem_storage`].
    pub store: Option<DocumentStore>,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            sessions: PgSessionRepository::new(pool.clone()),
            categories: PgCategoryRepository::new(pool.clone()),
            documents: PgDocumentRepository::new(pool.clone()),
            store: None,
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Configure blob storage with a filesystem backend rooted at `path`.
    pub fn with_filesystem_storage(mut self, path: &str) -> Self {
        self.store = Some(DocumentStore::new(FilesystemBackend::new(path)));
        self
    }

    /// The configured blob store, or a config error if storage was never set.
    pub fn store(&self) -> Result<&DocumentStore> {
        self.store
            .as_ref()
            .ok_or_else(|| Error::Config("Blob storage not configured".to_string()))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Config(format!("Migration failed: {}", e)))?;
        Ok(())
    }
}
