//! Docvault Storage Library
//!
//! Storage abstraction and implementations for document blobs: the Storage
//! trait plus S3 (`object_store`) and local filesystem backends.
//!
//! # Storage key format
//!
//! All backends use the same key layout: `documents/{document_id}/{filename}`.
//! Keys must not contain `..` or a leading `/`. Key generation and filename
//! sanitization are centralized in the `keys` module so backends stay
//! consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::sanitize_filename;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
