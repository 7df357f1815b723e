use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::storage::StorageLocation;

/// Registry record for a shared document.
///
/// `secret_hash` and `storage` are internal fields. They are never serialized
/// into an API response; response types below carry only the public view.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub owner_name: String,
    pub owner_email: String,
    /// Original filename as uploaded; used for the content-type allow-list
    /// and the download suggestion, never for path construction.
    pub file_name: String,
    pub storage: StorageLocation,
    pub content_type: String,
    pub file_size: i64,
    /// Salted Argon2 hash of the access secret.
    pub secret_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn storage_key(&self) -> &str {
        &self.storage.key
    }
}

/// Public view of a document, safe to return before authorization.
/// Renders the password prompt without leaking anything.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentPublicInfo {
    pub id: Uuid,
    pub file_name: String,
    pub owner_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Document> for DocumentPublicInfo {
    fn from(doc: &Document) -> Self {
        DocumentPublicInfo {
            id: doc.id,
            file_name: doc.file_name.clone(),
            owner_name: doc.owner_name.clone(),
            created_at: doc.created_at,
        }
    }
}

/// Administrator view of a document. Includes the owner email but still
/// excludes the secret hash and the storage location.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentAdminResponse {
    pub id: Uuid,
    pub file_name: String,
    pub owner_name: String,
    pub owner_email: String,
    pub content_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Document> for DocumentAdminResponse {
    fn from(doc: Document) -> Self {
        DocumentAdminResponse {
            id: doc.id,
            file_name: doc.file_name,
            owner_name: doc.owner_name,
            owner_email: doc.owner_email,
            content_type: doc.content_type,
            file_size: doc.file_size,
            created_at: doc.created_at,
        }
    }
}

/// Paginated admin listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentAdminResponse>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::storage::StorageBackend;

    fn test_document() -> Document {
        Document {
            id: Uuid::new_v4(),
            owner_name: "A".to_string(),
            owner_email: "a@x.com".to_string(),
            file_name: "report.pdf".to_string(),
            storage: StorageLocation {
                backend: StorageBackend::Local,
                key: "documents/abc/report.pdf".to_string(),
                url: "http://localhost:3000/media/documents/abc/report.pdf".to_string(),
            },
            content_type: "application/pdf".to_string(),
            file_size: 2048,
            secret_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_info_fields() {
        let doc = test_document();
        let info = DocumentPublicInfo::from(&doc);

        assert_eq!(info.id, doc.id);
        assert_eq!(info.file_name, "report.pdf");
        assert_eq!(info.owner_name, "A");
        assert_eq!(info.created_at, doc.created_at);
    }

    #[test]
    fn test_public_info_never_leaks_secret_or_storage() {
        let doc = test_document();
        let json = serde_json::to_value(DocumentPublicInfo::from(&doc)).unwrap();

        let rendered = json.to_string();
        assert!(!rendered.contains("argon2"));
        assert!(!rendered.contains("documents/abc"));
        assert!(!rendered.contains("owner_email"));
        assert!(!rendered.contains("a@x.com"));
    }

    #[test]
    fn test_admin_response_never_leaks_secret_or_storage() {
        let doc = test_document();
        let json = serde_json::to_value(DocumentAdminResponse::from(doc)).unwrap();

        let rendered = json.to_string();
        assert!(!rendered.contains("argon2"));
        assert!(!rendered.contains("documents/abc"));
        assert!(rendered.contains("a@x.com"));
    }
}
