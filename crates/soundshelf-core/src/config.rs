//! Configuration module
//!
//! Storage settings are read once, validated, and then handed to the facade
//! as an immutable value. Nothing downstream reads the process environment.

use std::env;
use std::fmt;

use crate::error::ConfigError;

/// Region used when `AWS_REGION` is not set
pub const DEFAULT_REGION: &str = "ap-south-1";

pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_BUCKET_NAME: &str = "S3_BUCKET_NAME";
pub const ENV_BASE_URL: &str = "S3_BASE_URL";
pub const ENV_ENDPOINT: &str = "S3_ENDPOINT";

/// Object storage configuration
#[derive(Clone, PartialEq, Eq)]
pub struct StorageConfig {
    access_key_id: String,
    secret_access_key: String,
    region: String,
    bucket_name: String,
    base_url: String,
    endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
}

impl StorageConfig {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build and validate configuration from an arbitrary variable source.
    ///
    /// Every required variable is checked before returning, so the error lists
    /// all missing names at once rather than only the first one.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let access_key_id = read(ENV_ACCESS_KEY_ID);
        let secret_access_key = read(ENV_SECRET_ACCESS_KEY);
        let bucket_name = read(ENV_BUCKET_NAME);
        let base_url = read(ENV_BASE_URL);

        let missing: Vec<&'static str> = [
            (ENV_ACCESS_KEY_ID, access_key_id.is_none()),
            (ENV_SECRET_ACCESS_KEY, secret_access_key.is_none()),
            (ENV_BUCKET_NAME, bucket_name.is_none()),
            (ENV_BASE_URL, base_url.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        match (access_key_id, secret_access_key, bucket_name, base_url) {
            (Some(access_key_id), Some(secret_access_key), Some(bucket_name), Some(base_url)) => {
                Self::new(
                    access_key_id,
                    secret_access_key,
                    read(ENV_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string()),
                    bucket_name,
                    base_url,
                    read(ENV_ENDPOINT),
                )
            }
            _ => Err(ConfigError::MissingVariables(missing)),
        }
    }

    /// Build configuration from explicit values.
    ///
    /// # Arguments
    /// * `base_url` - Public URL prefix for download links; a trailing `/` is dropped
    /// * `endpoint` - Optional custom endpoint URL for S3-compatible providers
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
        bucket_name: impl Into<String>,
        base_url: impl Into<String>,
        endpoint: Option<String>,
    ) -> Result<Self, ConfigError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !is_http_url(&base_url) {
            return Err(ConfigError::InvalidValue {
                name: ENV_BASE_URL,
                reason: format!("'{}' must start with http:// or https://", base_url),
            });
        }

        if let Some(ref endpoint) = endpoint {
            if !is_http_url(endpoint) {
                return Err(ConfigError::InvalidValue {
                    name: ENV_ENDPOINT,
                    reason: format!("'{}' must start with http:// or https://", endpoint),
                });
            }
        }

        let config = StorageConfig {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
            bucket_name: bucket_name.into(),
            base_url,
            endpoint,
        };

        tracing::debug!(
            bucket = %config.bucket_name,
            region = %config.region,
            endpoint = ?config.endpoint,
            "Storage configuration loaded"
        );

        Ok(config)
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .field("bucket_name", &self.bucket_name)
            .field("base_url", &self.base_url)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
