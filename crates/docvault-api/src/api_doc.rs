//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use docvault_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Docvault API",
        version = "0.1.0",
        description = "Password-gated document sharing. Visitors describe a shared document, submit its access password, and fetch the bytes with a short-lived, document-scoped grant. Administrators upload, list, and delete documents under /api/v1/admin/."
    ),
    paths(
        // Public document access
        handlers::document_describe::describe_document,
        handlers::document_authorize::authorize_document,
        handlers::document_content::fetch_document_content,
        // Administration
        handlers::admin_upload::upload_document,
        handlers::admin_list::list_documents,
        handlers::admin_delete::delete_document,
        // Operational
        handlers::health::health_check,
    ),
    components(schemas(
        models::DocumentPublicInfo,
        models::DocumentAdminResponse,
        models::DocumentListResponse,
        handlers::document_authorize::AuthorizeRequest,
        handlers::document_authorize::AuthorizeResponse,
        handlers::admin_upload::UploadResponse,
        handlers::admin_delete::DeleteResponse,
        handlers::health::HealthResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "documents", description = "Public password-gated document access"),
        (name = "admin", description = "Administrator document management"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
