//! Document HTTP handlers: list, upload, fetch, update, delete, download.
//!
//! Uploads arrive as multipart forms; the payload is written to blob
//! storage before the metadata row is inserted, and rolled back if the
//! insert fails so a failed upload leaves no artifact.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Deserializer};
use tracing::info;
use uuid::Uuid;

use docuflow_core::{
    normalize_tags, parse_tag_csv, sanitize_filename, CategoryRepository,
    CreateDocumentRequest, DocumentRepository, ListDocumentsRequest, UpdateDocumentRequest,
};

use crate::auth::RequireUser;
use crate::error::ApiError;
use crate::AppState;

/// Query parameters for document listing. Both filters combine with AND.
#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
}

/// List the user's documents, newest first.
pub async fn list_documents(
    State(state): State<AppState>,
    auth: RequireUser,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let documents = state
        .db
        .documents
        .list(
            auth.user.id,
            ListDocumentsRequest {
                category_id: query.category_id,
                search: query.search,
            },
        )
        .await?;
    Ok(Json(documents))
}

/// Fetch a single document's metadata.
pub async fn get_document(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let document = state
        .db
        .documents
        .find(auth.user.id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;
    Ok(Json(document))
}

/// Accumulated fields from the upload form.
#[derive(Default)]
struct UploadForm {
    file: Option<(Vec<u8>, Option<String>, Option<String>)>,
    title: Option<String>,
    category_id: Option<String>,
    tags: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        ApiError::BadRequest(format!("Failed to read file data: {}", e))
                    })?
                    .to_vec();
                form.file = Some((data, file_name, content_type));
            }
            Some("title") => {
                form.title = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read title: {}", e))
                })?);
            }
            Some("category_id") => {
                form.category_id = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read category_id: {}", e))
                })?);
            }
            Some("tags") => {
                form.tags = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read tags: {}", e))
                })?);
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Resolve the stored MIME type: the multipart part's declared type wins,
/// otherwise sniff the payload, otherwise `application/octet-stream`.
fn resolve_mime(declared: Option<&str>, data: &[u8]) -> String {
    declared
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| infer::get(data).map(|kind| kind.mime_type().to_string()))
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

/// Upload a document: store the payload, then insert the metadata row.
pub async fn upload_document(
    State(state): State<AppState>,
    auth: RequireUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_upload_form(multipart).await?;

    let (data, file_name, declared_mime) = form
        .file
        .ok_or_else(|| ApiError::BadRequest("File is required".to_string()))?;
    let title = form
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Title is required".to_string()))?
        .to_string();

    // Empty string in the form field means "no category".
    let category_id = match form.category_id.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(raw) => {
            let id = raw
                .parse::<Uuid>()
                .map_err(|_| ApiError::BadRequest("Invalid category_id".to_string()))?;
            Some(id)
        }
    };
    if let Some(id) = category_id {
        // Unknown or foreign categories are rejected rather than stored
        // dangling.
        if state.db.categories.find(auth.user.id, id).await?.is_none() {
            return Err(ApiError::BadRequest("Category not found".to_string()));
        }
    }

    let tags = form.tags.as_deref().map(parse_tag_csv).unwrap_or_default();
    let file_type = resolve_mime(declared_mime.as_deref(), &data);
    let file_name = sanitize_filename(file_name.as_deref().unwrap_or("unnamed_file"));
    let file_size = data.len() as i64;

    // Blob first, row second: the blob write is atomic, and the blob is
    // removed again if the insert fails, so neither order leaves a
    // dangling metadata row.
    let blob_id = Uuid::now_v7();
    let store = state.db.store()?;
    let (storage_path, content_hash) = store.store(blob_id, &data).await?;

    let inserted = state
        .db
        .documents
        .insert(CreateDocumentRequest {
            user_id: auth.user.id,
            title,
            file_name,
            file_type,
            file_size,
            content_hash,
            storage_path: storage_path.clone(),
            category_id,
            tags,
        })
        .await;

    let document = match inserted {
        Ok(document) => document,
        Err(e) => {
            store.remove(&storage_path).await;
            return Err(e.into());
        }
    };

    info!(
        subsystem = "api",
        component = "documents",
        op = "upload",
        document_id = %document.id,
        user_id = %auth.user.id,
        file_size,
        "Document uploaded"
    );

    Ok((StatusCode::CREATED, Json(document)))
}

/// Wire shape for metadata updates. `category_id` distinguishes three
/// states: absent (preserve), `null` or `""` (uncategorized), or an id.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDocumentBody {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_category_patch")]
    pub category_id: Option<Option<Uuid>>,
    pub tags: Option<Vec<String>>,
}

fn deserialize_category_patch<'de, D>(
    deserializer: D,
) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    // The UI sends the selector value verbatim: a UUID string, or an
    // empty string when "uncategorized" is chosen.
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(Some(None)),
        Some(s) => s
            .parse::<Uuid>()
            .map(|id| Some(Some(id)))
            .map_err(|_| D::Error::custom("invalid category_id")),
    }
}

/// Update document metadata. Fields absent from the body are preserved;
/// the binary payload is never touched.
pub async fn update_document(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateDocumentBody>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(Some(category_id)) = body.category_id {
        if state
            .db
            .categories
            .find(auth.user.id, category_id)
            .await?
            .is_none()
        {
            return Err(ApiError::BadRequest("Category not found".to_string()));
        }
    }

    let document = state
        .db
        .documents
        .update(
            auth.user.id,
            id,
            UpdateDocumentRequest {
                title: body.title,
                category_id: body.category_id,
                tags: body.tags.map(normalize_tags),
            },
        )
        .await?;

    Ok(Json(document))
}

/// Delete a document: metadata row first, then best-effort blob removal.
pub async fn delete_document(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state.db.documents.delete(auth.user.id, id).await?;
    state.db.store()?.remove(&removed.storage_path).await;

    info!(
        subsystem = "api",
        component = "documents",
        op = "delete",
        document_id = %id,
        user_id = %auth.user.id,
        "Document deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Download a document's payload with its original file name.
pub async fn download_document(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let document = state
        .db
        .documents
        .find(auth.user.id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;

    let data = state.db.store()?.load(&document.storage_path).await?;

    let content_type = HeaderValue::from_str(&document.file_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = format!(
        "attachment; filename=\"{}\"",
        document.file_name.replace('"', "_")
    );
    let content_disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    let headers = [
        (header::CONTENT_TYPE, content_type),
        (header::CONTENT_DISPOSITION, content_disposition),
    ];

    Ok((StatusCode::OK, headers, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_mime_prefers_declared() {
        assert_eq!(
            resolve_mime(Some("application/pdf"), b"whatever"),
            "application/pdf"
        );
    }

    #[test]
    fn test_resolve_mime_sniffs_when_undeclared() {
        // %PDF magic bytes
        let pdf = b"%PDF-1.7 rest of file";
        assert_eq!(resolve_mime(None, pdf), "application/pdf");
        assert_eq!(resolve_mime(Some("  "), pdf), "application/pdf");
    }

    #[test]
    fn test_resolve_mime_falls_back_to_octet_stream() {
        assert_eq!(resolve_mime(None, b"no magic here"), "application/octet-stream");
    }

    #[test]
    fn test_update_body_category_states() {
        // Absent: preserve.
        let body: UpdateDocumentBody = serde_json::from_str(r#"{"title":"t"}"#).unwrap();
        assert!(body.category_id.is_none());

        // Null: clear.
        let body: UpdateDocumentBody =
            serde_json::from_str(r#"{"category_id":null}"#).unwrap();
        assert_eq!(body.category_id, Some(None));

        // Empty string: clear (the UI's "uncategorized" selector value).
        let body: UpdateDocumentBody =
            serde_json::from_str(r#"{"category_id":""}"#).unwrap();
        assert_eq!(body.category_id, Some(None));

        // Id: re-associate.
        let id = Uuid::new_v4();
        let body: UpdateDocumentBody =
            serde_json::from_str(&format!(r#"{{"category_id":"{}"}}"#, id)).unwrap();
        assert_eq!(body.category_id, Some(Some(id)));
    }

    #[test]
    fn test_update_body_rejects_garbage_category() {
        let result: Result<UpdateDocumentBody, _> =
            serde_json::from_str(r#"{"category_id":"not-a-uuid"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_query_deserializes() {
        let q: ListDocumentsQuery =
            serde_json::from_str(r#"{"search":"report"}"#).unwrap();
        assert_eq!(q.search.as_deref(), Some("report"));
        assert!(q.category_id.is_none());
    }
}
