pub mod document;
pub mod storage;

pub use document::{
    Document, DocumentAdminResponse, DocumentListResponse, DocumentPublicInfo,
};
pub use storage::{StorageBackend, StorageLocation};
