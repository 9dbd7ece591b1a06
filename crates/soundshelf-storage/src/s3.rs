//! S3 client construction

use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::{ObjectStore, RetryConfig};
use soundshelf_core::StorageConfig;

use crate::error::{StorageError, StorageResult};

/// Build an S3 object store from validated configuration.
///
/// Credentials, region and bucket come from `config` only; the process
/// environment is not consulted.
pub fn build_store(config: &StorageConfig) -> StorageResult<Arc<dyn ObjectStore>> {
    build_store_with_retry(config, RetryConfig::default())
}

/// Same as [`build_store`] with an explicit transport retry policy.
pub fn build_store_with_retry(
    config: &StorageConfig,
    retry: RetryConfig,
) -> StorageResult<Arc<dyn ObjectStore>> {
    let mut builder = AmazonS3Builder::new()
        .with_access_key_id(config.access_key_id())
        .with_secret_access_key(config.secret_access_key())
        .with_region(config.region())
        .with_bucket_name(config.bucket_name())
        .with_retry(retry);

    if let Some(endpoint) = config.endpoint() {
        let allow_http = endpoint.starts_with("http://");
        builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
    }

    let store = builder.build().map_err(|e| {
        tracing::error!(
            error = %e,
            bucket = %config.bucket_name(),
            region = %config.region(),
            "Failed to build S3 client"
        );
        StorageError::Backend(e)
    })?;

    tracing::info!(
        bucket = %config.bucket_name(),
        region = %config.region(),
        endpoint = ?config.endpoint(),
        "S3 client initialized"
    );

    Ok(Arc::new(store))
}
