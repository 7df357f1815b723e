//! Filename extension to MIME type mapping.
//!
//! Content types for delivery are inferred from the original filename against
//! a fixed allow-list. Anything unrecognized falls back to
//! `application/octet-stream` so a stored object can never claim an
//! executable or scriptable type.

/// MIME type used when the extension is not in the allow-list.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content types accepted at upload time.
pub const ALLOWED_UPLOAD_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/avif",
];

/// Infer the delivery content type from a filename extension.
pub fn content_type_for_filename(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "avif" => "image/avif",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Check whether an uploaded content type is allowed.
pub fn is_allowed_upload_content_type(content_type: &str) -> bool {
    ALLOWED_UPLOAD_CONTENT_TYPES.contains(&content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(content_type_for_filename("report.pdf"), "application/pdf");
        assert_eq!(content_type_for_filename("photo.png"), "image/png");
        assert_eq!(content_type_for_filename("photo.jpg"), "image/jpeg");
        assert_eq!(content_type_for_filename("photo.JPEG"), "image/jpeg");
        assert_eq!(content_type_for_filename("photo.webp"), "image/webp");
        assert_eq!(content_type_for_filename("photo.avif"), "image/avif");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(content_type_for_filename("script.html"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for_filename("archive.tar.gz"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for_filename("no_extension"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for_filename(""), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_upload_allow_list() {
        assert!(is_allowed_upload_content_type("application/pdf"));
        assert!(is_allowed_upload_content_type("image/webp"));
        assert!(!is_allowed_upload_content_type("text/html"));
        assert!(!is_allowed_upload_content_type("application/x-msdownload"));
    }
}
