use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::document_authorize::GRANT_COOKIE_PREFIX;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, Response, StatusCode},
    response::IntoResponse,
};
use docvault_core::content_type::content_type_for_filename;
use docvault_core::AppError;
use docvault_storage::sanitize_filename;
use futures::StreamExt;
use std::sync::Arc;
use uuid::Uuid;

/// Pull the presented grant out of the request: `Authorization: Bearer`
/// first, then the document-scoped cookie set by `authorize`.
fn extract_grant(headers: &HeaderMap, document_id: Uuid) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        return Some(token.to_string());
    }

    let cookie_name = format!("{}{}", GRANT_COOKIE_PREFIX, document_id);
    headers
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.to_string())
}

#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}/content",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document bytes", content_type = "application/octet-stream"),
        (status = 403, description = "Missing, expired, or wrong-document grant", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 503, description = "Storage temporarily unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers), fields(document_id = %id, operation = "fetch_document_content"))]
pub async fn fetch_document_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpAppError> {
    // Grant check comes before the registry lookup: without a valid grant the
    // requester learns nothing, not even whether the document exists.
    let token = extract_grant(&headers, id)
        .ok_or_else(|| AppError::Forbidden("No access grant presented".to_string()))?;

    state
        .grants
        .verify(id, &token)
        .map_err(|e| AppError::Forbidden(e.as_str().to_string()))?;

    let document = state
        .registry
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    tracing::debug!("Proxying document content from storage");

    let stream = state
        .storage
        .download_stream(document.storage_key())
        .await
        .map_err(HttpAppError::from)?;

    // Wrap storage stream for axum Body
    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    // Content type comes from the extension allow-list, never from client
    // input; the filename in the disposition header is sanitized.
    let content_type = content_type_for_filename(&document.file_name);
    let content_disposition = format!(
        "inline; filename=\"{}\"",
        sanitize_filename(&document.file_name)
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, content_disposition.as_str())
        .header(header::CACHE_CONTROL, "private, no-cache")
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_grant_from_bearer() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer v1.123.abc"),
        );

        assert_eq!(extract_grant(&headers, id).as_deref(), Some("v1.123.abc"));
    }

    #[test]
    fn test_extract_grant_from_cookie() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        let cookie = format!("other=1; {}{}=v1.456.def; theme=dark", GRANT_COOKIE_PREFIX, id);
        headers.insert(header::COOKIE, HeaderValue::from_str(&cookie).unwrap());

        assert_eq!(extract_grant(&headers, id).as_deref(), Some("v1.456.def"));
    }

    #[test]
    fn test_cookie_for_other_document_is_ignored() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        let cookie = format!("{}{}=v1.456.def", GRANT_COOKIE_PREFIX, other);
        headers.insert(header::COOKIE, HeaderValue::from_str(&cookie).unwrap());

        assert_eq!(extract_grant(&headers, id), None);
    }

    #[test]
    fn test_no_grant_headers() {
        let id = Uuid::new_v4();
        let headers = HeaderMap::new();
        assert_eq!(extract_grant(&headers, id), None);
    }
}
