//! Configuration module
//!
//! Environment-driven configuration for the API service: server, database,
//! storage backend, grant signing, and upload limits. Loaded once at startup
//! and validated before anything binds a port.

use std::env;

use crate::models::StorageBackend;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_GRANT_TTL_SECONDS: i64 = 600;
const DEFAULT_AUTHORIZE_MAX_FAILURES: u32 = 10;
const DEFAULT_AUTHORIZE_FAILURE_WINDOW_SECS: u64 = 60;
const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 20 * 1024 * 1024;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub public_base_url: String,

    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,

    /// Bearer key for the administrator surface.
    pub admin_api_key: String,
    /// Server-held HMAC key for access grant tokens.
    pub grant_signing_key: String,
    pub grant_ttl_seconds: i64,
    pub authorize_max_failures: u32,
    pub authorize_failure_window_seconds: u64,

    pub max_file_size_bytes: usize,

    pub storage_backend: StorageBackend,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_required(key: &str) -> Result<String, anyhow::Error> {
    env::var(key).map_err(|_| anyhow::anyhow!("{} must be set", key))
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .parse::<StorageBackend>()
            .map_err(|e| anyhow::anyhow!(e))?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Config {
            server_port: env_parse("SERVER_PORT", DEFAULT_SERVER_PORT),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            cors_origins,
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            database_url: env_required("DATABASE_URL")?,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
            db_timeout_seconds: env_parse("DB_TIMEOUT_SECONDS", DEFAULT_CONNECTION_TIMEOUT_SECS),
            admin_api_key: env_required("ADMIN_API_KEY")?,
            grant_signing_key: env_required("GRANT_SIGNING_KEY")?,
            grant_ttl_seconds: env_parse("GRANT_TTL_SECONDS", DEFAULT_GRANT_TTL_SECONDS),
            authorize_max_failures: env_parse(
                "AUTHORIZE_MAX_FAILURES",
                DEFAULT_AUTHORIZE_MAX_FAILURES,
            ),
            authorize_failure_window_seconds: env_parse(
                "AUTHORIZE_FAILURE_WINDOW_SECONDS",
                DEFAULT_AUTHORIZE_FAILURE_WINDOW_SECS,
            ),
            max_file_size_bytes: env_parse("MAX_FILE_SIZE_BYTES", DEFAULT_MAX_FILE_SIZE_BYTES),
            storage_backend,
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
        })
    }

    /// Fail fast on misconfiguration before the server starts.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.grant_signing_key.len() < 32 {
            anyhow::bail!("GRANT_SIGNING_KEY must be at least 32 bytes");
        }
        if self.admin_api_key.len() < 16 {
            anyhow::bail!("ADMIN_API_KEY must be at least 16 characters");
        }
        if self.grant_ttl_seconds <= 0 {
            anyhow::bail!("GRANT_TTL_SECONDS must be positive");
        }
        match self.storage_backend {
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    anyhow::bail!("LOCAL_STORAGE_PATH must be set for the local backend");
                }
            }
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() || self.s3_region.is_none() {
                    anyhow::bail!("S3_BUCKET and S3_REGION must be set for the s3 backend");
                }
            }
        }
        Ok(())
    }

    /// Check if the application is running in production mode.
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Share link for a freshly uploaded document.
    pub fn share_url(&self, id: uuid::Uuid) -> String {
        format!("{}/s/{}", self.public_base_url.trim_end_matches('/'), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 3000,
            environment: "test".to_string(),
            cors_origins: vec![],
            public_base_url: "https://docs.example.com".to_string(),
            database_url: "postgres://localhost/docvault".to_string(),
            db_max_connections: 20,
            db_timeout_seconds: 30,
            admin_api_key: "dv_admin_0123456789abcdef".to_string(),
            grant_signing_key: "0123456789abcdef0123456789abcdef".to_string(),
            grant_ttl_seconds: 600,
            authorize_max_failures: 10,
            authorize_failure_window_seconds: 60,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            storage_backend: StorageBackend::Local,
            local_storage_path: Some("/tmp/docvault".to_string()),
            local_storage_base_url: Some("http://localhost:3000/media".to_string()),
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
        }
    }

    #[test]
    fn test_validate_accepts_complete_local_config() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_signing_key() {
        let mut config = base_config();
        config.grant_signing_key = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_s3_without_bucket() {
        let mut config = base_config();
        config.storage_backend = StorageBackend::S3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_share_url() {
        let mut config = base_config();
        config.public_base_url = "https://docs.example.com/".to_string();
        let id = uuid::Uuid::new_v4();
        assert_eq!(
            config.share_url(id),
            format!("https://docs.example.com/s/{}", id)
        );
    }

    #[test]
    fn test_is_production() {
        let mut config = base_config();
        assert!(!config.is_production());
        config.environment = "Production".to_string();
        assert!(config.is_production());
    }
}
