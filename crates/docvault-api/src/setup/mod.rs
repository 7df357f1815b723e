//! Application setup and initialization
//!
//! All application initialization logic lives here rather than in main.rs:
//! configuration validation, database, storage, state, and routes.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::auth::AuthorizeAttemptLimiter;
use crate::grant::GrantSigner;
use crate::state::AppState;
use anyhow::{Context, Result};
use docvault_core::Config;
use docvault_db::DocumentRepository;
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let authorize_limiter = AuthorizeAttemptLimiter::new(
        config.authorize_max_failures,
        config.authorize_failure_window_seconds,
    );
    spawn_limiter_cleanup(authorize_limiter.clone(), config.authorize_failure_window_seconds);

    let state = Arc::new(AppState {
        registry: DocumentRepository::new(pool.clone()),
        pool,
        storage,
        grants: GrantSigner::new(config.grant_signing_key.as_bytes(), config.grant_ttl_seconds),
        authorize_limiter,
        config: config.clone(),
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Periodically drop expired throttling entries so the map cannot grow
/// unbounded under a scan of random document ids.
fn spawn_limiter_cleanup(limiter: AuthorizeAttemptLimiter, window_seconds: u64) {
    let interval = Duration::from_secs(window_seconds.max(60));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            limiter.cleanup_expired().await;
        }
    });
}
