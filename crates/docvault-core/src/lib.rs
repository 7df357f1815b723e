//! Core types for the docvault document-sharing service.
//!
//! Domain models, configuration, the unified error type, access secret
//! hashing, and the content-type allow-list. Everything here is shared by the
//! registry, storage, and API crates.

pub mod config;
pub mod content_type;
pub mod error;
pub mod models;
pub mod secret;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
