//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement. Keys are document-scoped: `documents/{document_id}/{filename}`.

use docvault_core::models::StorageBackend;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A stream of object bytes, yielded chunk by chunk.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// The registry and delivery path work against this interface without
/// coupling to a specific backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload a document's bytes and return (storage_key, storage_url).
    ///
    /// The storage_key is the internal identifier used for later retrieval.
    /// The storage_url is the backend's permanent location; it is recorded in
    /// the registry but never exposed to clients.
    async fn upload(
        &self,
        document_id: Uuid,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<(String, String)>;

    /// Download an object fully into memory.
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Download an object as a stream of `Bytes` chunks, for delivery without
    /// buffering the whole payload.
    async fn download_stream(&self, storage_key: &str) -> StorageResult<ByteStream>;

    /// Delete an object by its storage key.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if an object exists.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the storage backend type.
    fn backend_type(&self) -> StorageBackend;
}
