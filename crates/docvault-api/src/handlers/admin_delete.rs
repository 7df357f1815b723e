use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use docvault_core::AppError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/documents/{id}",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document deleted", body = DeleteResponse),
        (status = 401, description = "Missing or invalid admin key", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(document_id = %id, operation = "delete_document"))]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let document = state
        .registry
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    // Storage first, registry second. A failed storage delete leaves a stale
    // blob, which is tolerable; a registry record pointing at nothing is not,
    // so the registry delete proceeds regardless.
    if let Err(e) = state.storage.delete(document.storage_key()).await {
        tracing::warn!(
            key = %document.storage_key(),
            error = %e,
            "Failed to delete stored object; continuing with registry delete"
        );
    }

    let deleted = state.registry.delete(id).await?;

    tracing::info!(deleted, "Document deleted");

    Ok(Json(DeleteResponse { deleted }))
}
