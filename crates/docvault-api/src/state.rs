//! Application state shared across handlers.

use crate::auth::AuthorizeAttemptLimiter;
use crate::grant::GrantSigner;
use docvault_core::Config;
use docvault_db::DocumentRepository;
use docvault_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

/// Main application state: registry, storage, grant signing, and config.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub registry: DocumentRepository,
    pub storage: Arc<dyn Storage>,
    pub grants: GrantSigner,
    pub authorize_limiter: AuthorizeAttemptLimiter,
    pub config: Config,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
