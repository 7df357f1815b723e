use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use docvault_core::content_type::{content_type_for_filename, is_allowed_upload_content_type};
use docvault_core::models::{Document, StorageLocation};
use docvault_core::secret::hash_secret;
use docvault_core::AppError;
use docvault_storage::sanitize_filename;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub id: Uuid,
    /// Link to hand to the document's audience.
    pub share_url: String,
}

#[derive(Default)]
struct UploadForm {
    owner_name: Option<String>,
    owner_email: Option<String>,
    secret: Option<String>,
    file_name: Option<String>,
    file_content_type: Option<String>,
    file_data: Option<Vec<u8>>,
}

async fn parse_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart payload: {}", e)))?
    {
        match field.name() {
            Some("name") => {
                form.owner_name = Some(read_text(field).await?);
            }
            Some("email") => {
                form.owner_email = Some(read_text(field).await?);
            }
            Some("password") => {
                form.secret = Some(read_text(field).await?);
            }
            Some("file") => {
                form.file_name = field.file_name().map(sanitize_filename);
                form.file_content_type = field.content_type().map(String::from);
                form.file_data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| {
                            AppError::InvalidInput(format!("Failed to read file field: {}", e))
                        })?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid form field: {}", e)))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/documents",
    tag = "admin",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Document uploaded", body = UploadResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid admin key", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_document"))]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = parse_form(multipart).await?;

    let owner_name = require_field(form.owner_name, "name")?;
    let owner_email = require_field(form.owner_email, "email")?;
    let secret = require_field(form.secret, "password")?;
    let file_name = require_field(form.file_name, "file")?;
    let data = form
        .file_data
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::InvalidInput("File is empty".to_string()))?;

    // The declared multipart content type is advisory; fall back to the
    // extension mapping when the client did not set one.
    let content_type = form
        .file_content_type
        .unwrap_or_else(|| content_type_for_filename(&file_name).to_string());

    if !is_allowed_upload_content_type(&content_type) {
        return Err(AppError::InvalidInput(format!(
            "Content type '{}' is not allowed; only PDF and image uploads are accepted",
            content_type
        ))
        .into());
    }

    if data.len() > state.config.max_file_size_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "{} bytes exceeds max {} bytes",
            data.len(),
            state.config.max_file_size_bytes
        ))
        .into());
    }

    let id = Uuid::new_v4();
    let file_size = data.len() as i64;
    let secret_hash = hash_secret(&secret)?;

    // Bytes land in storage before the registry record exists; a record must
    // never point at content that is not yet retrievable.
    let (storage_key, storage_url) = state
        .storage
        .upload(id, &file_name, &content_type, data)
        .await
        .map_err(HttpAppError::from)?;

    let document = Document {
        id,
        owner_name,
        owner_email,
        file_name,
        storage: StorageLocation {
            backend: state.storage.backend_type(),
            key: storage_key.clone(),
            url: storage_url,
        },
        content_type,
        file_size,
        secret_hash,
        created_at: Utc::now(),
    };

    let document = match state.registry.create(document).await {
        Ok(document) => document,
        Err(e) => {
            // Cleanup storage on registry failure so the blob does not leak.
            let storage = state.storage.clone();
            tokio::spawn(async move {
                if let Err(cleanup_err) = storage.delete(&storage_key).await {
                    tracing::warn!(
                        key = %storage_key,
                        error = %cleanup_err,
                        "Failed to clean up stored object after registry failure"
                    );
                }
            });
            return Err(e.into());
        }
    };

    tracing::info!(
        document_id = %document.id,
        file_size = document.file_size,
        "Document uploaded"
    );

    Ok(Json(UploadResponse {
        id: document.id,
        share_url: state.config.share_url(document.id),
    }))
}

fn require_field(value: Option<String>, name: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("Missing required field: {}", name)))
}
