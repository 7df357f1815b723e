use chrono::{DateTime, Utc};
use docvault_core::models::{Document, StorageBackend, StorageLocation};
use docvault_core::AppError;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

/// Database row for a document record.
#[derive(Debug, Clone, FromRow)]
struct DocumentRow {
    id: Uuid,
    owner_name: String,
    owner_email: String,
    file_name: String,
    storage_backend: String,
    storage_key: String,
    storage_url: String,
    content_type: String,
    file_size: i64,
    secret_hash: String,
    created_at: DateTime<Utc>,
}

impl DocumentRow {
    fn into_document(self) -> Result<Document, AppError> {
        let backend = self
            .storage_backend
            .parse::<StorageBackend>()
            .map_err(AppError::Internal)?;

        Ok(Document {
            id: self.id,
            owner_name: self.owner_name,
            owner_email: self.owner_email,
            file_name: self.file_name,
            storage: StorageLocation {
                backend,
                key: self.storage_key,
                url: self.storage_url,
            },
            content_type: self.content_type,
            file_size: self.file_size,
            secret_hash: self.secret_hash,
            created_at: self.created_at,
        })
    }
}

/// Document registry backed by Postgres.
///
/// The whole record is written in one INSERT, so single-record reads are
/// atomic; no reader can observe a partially written record.
#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a new document record. Fails with `Conflict` if the id already
    /// exists.
    #[tracing::instrument(
        skip(self, document),
        fields(db.table = "documents", db.operation = "insert", document_id = %document.id)
    )]
    pub async fn create(&self, document: Document) -> Result<Document, AppError> {
        let row = sqlx::query_as::<Postgres, DocumentRow>(
            r#"
            INSERT INTO documents (
                id, owner_name, owner_email, file_name,
                storage_backend, storage_key, storage_url,
                content_type, file_size, secret_hash, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(document.id)
        .bind(&document.owner_name)
        .bind(&document.owner_email)
        .bind(&document.file_name)
        .bind(document.storage.backend.to_string())
        .bind(&document.storage.key)
        .bind(&document.storage.url)
        .bind(&document.content_type)
        .bind(document.file_size)
        .bind(&document.secret_hash)
        .bind(document.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(format!("Document {} already exists", document.id))
            }
            _ => AppError::from(e),
        })?;

        row.into_document()
    }

    /// Fetch a record by id. Returns `Ok(None)` for an unknown id.
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    pub async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let row = sqlx::query_as::<Postgres, DocumentRow>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(DocumentRow::into_document).transpose()
    }

    /// List records ordered by `created_at` descending, with the total count
    /// for pagination. The id tiebreak keeps ordering stable when records
    /// share a timestamp.
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Document>, i64), AppError> {
        let rows = sqlx::query_as::<Postgres, DocumentRow>(
            "SELECT * FROM documents ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(&self.pool)
            .await?;

        let documents = rows
            .into_iter()
            .map(DocumentRow::into_document)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((documents, total))
    }

    /// Delete a record by id. Returns `false` when nothing was deleted, so
    /// callers decide whether a missing record is an error.
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "delete"))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_row() -> DocumentRow {
        DocumentRow {
            id: Uuid::new_v4(),
            owner_name: "A".to_string(),
            owner_email: "a@x.com".to_string(),
            file_name: "report.pdf".to_string(),
            storage_backend: "local".to_string(),
            storage_key: "documents/x/report.pdf".to_string(),
            storage_url: "http://localhost:3000/media/documents/x/report.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            file_size: 1024,
            secret_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_into_document() {
        let row = test_row();
        let id = row.id;
        let doc = row.into_document().unwrap();

        assert_eq!(doc.id, id);
        assert_eq!(doc.storage.backend, StorageBackend::Local);
        assert_eq!(doc.storage_key(), "documents/x/report.pdf");
    }

    #[test]
    fn test_row_with_unknown_backend_is_internal_error() {
        let mut row = test_row();
        row.storage_backend = "carrier-pigeon".to_string();

        assert!(matches!(
            row.into_document(),
            Err(AppError::Internal(_))
        ));
    }
}
