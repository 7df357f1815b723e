use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            other => Err(format!("Unknown storage backend: {}", other)),
        }
    }
}

/// Where a document's bytes live in object storage.
///
/// Owned by the registry record and resolved only by the content deliverer.
/// The `url` is the backend's permanent location and must never be sent to a
/// client; delivery always proxies through the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageLocation {
    pub backend: StorageBackend,
    pub key: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_roundtrip() {
        assert_eq!("s3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert_eq!(
            "local".parse::<StorageBackend>().unwrap(),
            StorageBackend::Local
        );
        assert_eq!(StorageBackend::S3.to_string(), "s3");
        assert!("gcs".parse::<StorageBackend>().is_err());
    }
}
