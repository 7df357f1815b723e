//! Shared key generation for storage backends.
//!
//! Key format: `documents/{document_id}/{filename}`. The filename component is
//! sanitized before use; keys are built from the generated document id, never
//! from client-supplied paths.

use uuid::Uuid;

/// Generate a storage key for the given document and filename.
///
/// All backends must use this format for consistency.
pub fn generate_storage_key(document_id: Uuid, filename: &str) -> String {
    format!("documents/{}/{}", document_id, sanitize_filename(filename))
}

/// Strip any path components from a client-supplied filename.
///
/// Keeps only the final component and replaces characters that have meaning
/// in storage keys or HTTP headers.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| match c {
            '\0'..='\x1f' | '"' => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "unnamed".to_string()
    } else {
        cleaned
    }
}
