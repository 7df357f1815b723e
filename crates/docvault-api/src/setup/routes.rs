//! Route configuration and setup

use crate::auth::AuthState;
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Json, Router,
};
use docvault_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

// Headroom above the file size limit for the other multipart fields.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState {
        admin_api_key: config.admin_api_key.clone(),
    });

    // Public routes (no authentication required)
    let public_routes = public_routes(state.clone());

    // Admin routes behind the bearer-key middleware
    let admin_routes = admin_routes(state.clone()).layer(axum::middleware::from_fn_with_state(
        auth_state,
        crate::auth::admin_auth_middleware,
    ));

    let app = public_routes
        .merge(admin_routes)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .layer(RequestBodyLimitLayer::new(
            config.max_file_size_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();

        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
            .allow_credentials(true)
    };
    Ok(cors)
}

/// Public routes (no authentication required)
fn public_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/v1/documents/{id}", get(handlers::describe_document))
        .route(
            "/api/v1/documents/{id}/authorize",
            post(handlers::authorize_document),
        )
        .route(
            "/api/v1/documents/{id}/content",
            get(handlers::fetch_document_content),
        )
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .with_state(state)
}

/// Administrator routes
fn admin_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/v1/admin/documents",
            post(handlers::upload_document).get(handlers::list_documents),
        )
        .route(
            "/api/v1/admin/documents/{id}",
            delete(handlers::delete_document),
        )
        .with_state(state)
}
