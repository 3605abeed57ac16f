//! Core data models for DocuFlow.
//!
//! These types are shared across all DocuFlow crates and represent
//! the core domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// USER TYPES
// =============================================================================

/// A registered account, including the stored credential hash.
///
/// Never serialized to API responses directly; use [`UserPublic`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User record as exposed over the API (no credential material).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPublic {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserPublic {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

// =============================================================================
// SESSION TYPES
// =============================================================================

/// A server-side session backing an opaque bearer token.
///
/// Only the SHA-256 digest of the token is stored; the cleartext token is
/// returned to the client once at issue time and never persisted.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has passed its expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

// =============================================================================
// CATEGORY TYPES
// =============================================================================

/// User-defined grouping label for documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// DOCUMENT TYPES
// =============================================================================

/// Document metadata. The binary payload lives in blob storage at
/// `storage_path` and is immutable; only metadata is ever updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    /// Original upload file name, used for download Content-Disposition.
    pub file_name: String,
    /// MIME type recorded at upload.
    pub file_type: String,
    pub file_size: i64,
    /// BLAKE3 hex digest of the payload.
    pub content_hash: String,
    /// Relative blob path under the storage root.
    #[serde(skip_serializing, default)]
    pub storage_path: String,
    pub category_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub uploaded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_user_public_strips_credentials() {
        let user = User {
            id: Uuid::new_v4(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            created_at: Utc::now(),
        };
        let public = UserPublic::from(user.clone());
        assert_eq!(public.id, user.id);
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: "abc".to_string(),
            created_at: now,
            expires_at: now + Duration::hours(24),
        };
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::hours(25)));
        assert!(session.is_expired(session.expires_at));
    }

    #[test]
    fn test_document_serialization_hides_storage_path() {
        let doc = Document {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Quarterly report".to_string(),
            file_name: "report.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            file_size: 1024,
            content_hash: "deadbeef".to_string(),
            storage_path: "files/aa/bb/x.bin".to_string(),
            category_id: None,
            tags: vec!["finance".to_string()],
            uploaded_at: Utc::now(),
        };
        let json = serde_json::to_string(&doc).unwrap();
        assert!(!json.contains("storage_path"));
        assert!(json.contains("report.pdf"));
    }
}
