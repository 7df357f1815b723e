use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use docvault_core::secret::{verify_secret, DUMMY_SECRET_HASH};
use docvault_core::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Cookie carrying a grant for the in-browser viewer. The name is suffixed
/// with the document id so grants for different documents never collide.
pub const GRANT_COOKIE_PREFIX: &str = "docvault_grant_";

#[derive(Debug, Deserialize, ToSchema)]
pub struct AuthorizeRequest {
    /// The document's access password.
    pub secret: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorizeResponse {
    /// Bearer token for fetching the document content.
    pub grant_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Build the Set-Cookie value for a freshly issued grant. `Secure` is added
/// in production, where the service sits behind TLS; local development stays
/// on plain HTTP.
fn grant_cookie(id: Uuid, token: &str, ttl_seconds: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        GRANT_COOKIE_PREFIX, id, token, ttl_seconds
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[utoipa::path(
    post,
    path = "/api/v1/documents/{id}/authorize",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    request_body = AuthorizeRequest,
    responses(
        (status = 200, description = "Access granted", body = AuthorizeResponse),
        (status = 401, description = "Wrong secret", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 429, description = "Too many failed attempts", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(document_id = %id, operation = "authorize_document"))]
pub async fn authorize_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<AuthorizeRequest>,
) -> Result<Response, HttpAppError> {
    if state.authorize_limiter.is_blocked(id).await {
        return Err(AppError::TooManyAttempts(
            "Too many failed password attempts for this document".to_string(),
        )
        .into());
    }

    let document = state.registry.get(id).await?;

    let Some(document) = document else {
        // Burn the same verification work as the found path so an unknown id
        // is not distinguishable from a wrong password by response timing.
        let _ = verify_secret(&request.secret, DUMMY_SECRET_HASH)?;
        return Err(AppError::NotFound("Document not found".to_string()).into());
    };

    if !verify_secret(&request.secret, &document.secret_hash)? {
        state.authorize_limiter.record_failure(id).await;
        // Generic denial only; no hint about why verification failed.
        return Err(AppError::Unauthorized("Invalid password".to_string()).into());
    }

    let grant = state.grants.issue(id);

    tracing::debug!(expires_at = %grant.expires_at, "Access grant issued");

    // The viewer widget presents the grant as a cookie; API clients use the
    // bearer token from the body. Both carry the same signed value.
    let cookie = grant_cookie(
        id,
        &grant.token,
        state.config.grant_ttl_seconds,
        state.config.is_production(),
    );
    let cookie_value = HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(format!("Failed to build cookie header: {}", e)))?;

    let mut response = Json(AuthorizeResponse {
        grant_token: grant.token,
        expires_at: grant.expires_at,
    })
    .into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie_value);

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_cookie_is_document_scoped_and_http_only() {
        let id = Uuid::new_v4();
        let cookie = grant_cookie(id, "v1.123.abc", 600, false);

        assert!(cookie.starts_with(&format!("{}{}=v1.123.abc", GRANT_COOKIE_PREFIX, id)));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=600"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_grant_cookie_is_secure_in_production() {
        let id = Uuid::new_v4();
        let cookie = grant_cookie(id, "v1.123.abc", 600, true);
        assert!(cookie.ends_with("; Secure"));
    }
}
