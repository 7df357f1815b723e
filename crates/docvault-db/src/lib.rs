//! Database repositories for the document registry.
//!
//! One repository per domain entity; currently only the document registry.
//! Schema lives under `migrations/` and is applied with `sqlx::migrate!` at
//! startup.

pub mod document;

pub use document::DocumentRepository;

/// Embedded migrations for the registry schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
