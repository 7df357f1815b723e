//! Storage backend setup

use anyhow::{Context, Result};
use docvault_core::Config;
use docvault_storage::Storage;
use std::sync::Arc;

/// Create the configured storage backend.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = docvault_storage::create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(backend = %storage.backend_type(), "Storage backend initialized");

    Ok(storage)
}
