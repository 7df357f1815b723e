use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use docvault_core::models::{DocumentAdminResponse, DocumentListResponse};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

/// Clamp the requested page and limit and derive the row offset.
fn page_window(query: &ListQuery) -> (i64, i64, i64) {
    let page = query.page.max(1);
    let limit = query.limit.clamp(1, MAX_PAGE_SIZE);
    (page, limit, (page - 1) * limit)
}

fn total_pages(total: i64, limit: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/documents",
    tag = "admin",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated document listing", body = DocumentListResponse),
        (status = 401, description = "Missing or invalid admin key", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_documents"))]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (page, limit, offset) = page_window(&query);

    let (documents, total) = state.registry.list(offset, limit).await?;

    Ok(Json(DocumentListResponse {
        documents: documents
            .into_iter()
            .map(DocumentAdminResponse::from)
            .collect(),
        total,
        page,
        total_pages: total_pages(total, limit),
    }))
}
