//! Blob storage for document payloads.
//!
//! Payloads are written once at upload and never mutated; metadata edits
//! touch only the database row. Paths are sharded by the leading bytes of
//! the document's UUIDv7 so directories stay small.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use docuflow_core::{Error, Result};

/// Storage backend trait for different storage implementations.
///
/// Allows abstracting over filesystem, S3, or other storage providers.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write data to the specified path, atomically.
    async fn write(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Read data from the specified path.
    async fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Delete data at the specified path. Deleting a missing path is not
    /// an error.
    async fn delete(&self, path: &str) -> Result<()>;

    /// Check if data exists at the specified path.
    async fn exists(&self, path: &str) -> Result<bool>;
}

/// Filesystem storage backend.
///
/// Stores blobs in a directory hierarchy under a base path.
/// Path format: `files/{first-2-hex}/{next-2-hex}/{uuid}.bin`
pub struct FilesystemBackend {
    base_path: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend with the given base directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }

    /// Validate that the storage backend can write, read, and delete files.
    ///
    /// Performs a full round-trip test at startup to catch filesystem
    /// issues (permission errors, missing mounts) before the first upload.
    pub async fn validate(&self) -> std::result::Result<(), String> {
        let test_dir = self.base_path.join("files/.health-check");
        let test_file = test_dir.join("test.bin");

        fs::create_dir_all(&test_dir)
            .await
            .map_err(|e| format!("create_dir_all({:?}): {}", test_dir, e))?;

        let data = b"storage-health-check";
        fs::write(&test_file, data)
            .await
            .map_err(|e| format!("write({:?}): {}", test_file, e))?;

        let read_data = fs::read(&test_file)
            .await
            .map_err(|e| format!("read({:?}): {}", test_file, e))?;
        if read_data != data {
            return Err("read-back mismatch".to_string());
        }

        fs::remove_file(&test_file)
            .await
            .map_err(|e| format!("remove_file({:?}): {}", test_file, e))?;
        let _ = fs::remove_dir(&test_dir).await;

        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FilesystemBackend {
    async fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);
        debug!(
            subsystem = "storage",
            component = "filesystem",
            op = "write",
            storage_path = %path,
            size = data.len(),
            "Writing blob"
        );

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                warn!(parent = %parent.display(), error = %e, "file_storage: create_dir_all failed");
                e
            })?;
        }

        // Atomic write: temp file + rename, so a crash mid-write never
        // leaves a partial blob at the final path.
        let temp_path = full_path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &full_path).await.map_err(|e| {
            warn!(from = %temp_path.display(), to = %full_path.display(), error = %e, "file_storage: rename failed");
            e
        })?;

        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.full_path(path);
        Ok(fs::read(full_path).await?)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let full_path = self.full_path(path);
        if fs::try_exists(&full_path).await? {
            fs::remove_file(full_path).await?;
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let full_path = self.full_path(path);
        Ok(fs::try_exists(full_path).await?)
    }
}

/// Compute BLAKE3 hash of data with "blake3:" prefix.
pub fn compute_content_hash(data: &[u8]) -> String {
    let hash = blake3::hash(data);
    format!("blake3:{}", hash.to_hex())
}

/// Generate a blob path from a document UUID.
///
/// Path format: `files/{first-2-hex}/{next-2-hex}/{uuid}.bin`
pub fn generate_storage_path(uuid: &Uuid) -> String {
    let hex = uuid.as_hyphenated().to_string().replace('-', "");
    format!(
        "files/{}/{}/{}.bin",
        &hex[0..2],
        &hex[2..4],
        uuid.as_hyphenated()
    )
}

/// Blob store used by the upload/download/delete paths.
pub struct DocumentStore {
    backend: Box<dyn StorageBackend>,
}

impl DocumentStore {
    /// Create a document store over the given backend.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Store a payload for `document_id`. Returns `(storage_path,
    /// content_hash)`.
    pub async fn store(&self, document_id: Uuid, data: &[u8]) -> Result<(String, String)> {
        let storage_path = generate_storage_path(&document_id);
        let content_hash = compute_content_hash(data);
        self.backend.write(&storage_path, data).await?;
        Ok((storage_path, content_hash))
    }

    /// Load a payload by its stored path. A missing blob maps to a
    /// storage error rather than a bare I/O error so callers can surface
    /// a 404 without a partial body.
    pub async fn load(&self, storage_path: &str) -> Result<Vec<u8>> {
        if !self.backend.exists(storage_path).await? {
            return Err(Error::Storage(format!(
                "Stored file missing: {}",
                storage_path
            )));
        }
        self.backend.read(storage_path).await
    }

    /// Remove a payload. Best-effort: a missing blob is logged, not fatal,
    /// because the metadata row is already gone by the time this runs.
    pub async fn remove(&self, storage_path: &str) {
        if let Err(e) = self.backend.delete(storage_path).await {
            warn!(
                subsystem = "storage",
                component = "document_store",
                op = "remove",
                storage_path = %storage_path,
                error = %e,
                "Failed to delete blob; leaving orphan"
            );
        }
    }
}
