//! Failure-path tests against an S3 endpoint that refuses connections.
//!
//! Run with: `cargo test -p soundshelf-storage --test unreachable_test`

use object_store::RetryConfig;
use soundshelf_storage::s3::build_store_with_retry;
use soundshelf_storage::{AudioStorage, BucketStats, StorageConfig, StorageError};

fn unreachable_storage() -> AudioStorage {
    let config = StorageConfig::new(
        "AKIAEXAMPLE",
        "secret",
        "ap-south-1",
        "clips",
        "https://cdn.example.com",
        Some("http://127.0.0.1:1".to_string()),
    )
    .unwrap();
    let retry = RetryConfig {
        max_retries: 0,
        ..Default::default()
    };
    let store = build_store_with_retry(&config, retry).unwrap();
    AudioStorage::with_store(store, config.bucket_name(), config.base_url())
}

#[tokio::test]
async fn test_stats_degrade_to_zero() {
    let storage = unreachable_storage();
    assert_eq!(storage.get_bucket_stats().await, BucketStats::default());
}

#[tokio::test]
async fn test_connection_reports_false() {
    let storage = unreachable_storage();
    assert!(!storage.test_connection().await);
}

#[tokio::test]
async fn test_list_failure_is_wrapped() {
    let storage = unreachable_storage();
    assert!(matches!(
        storage.list_files().await,
        Err(StorageError::ListFailed { .. })
    ));
}

#[tokio::test]
async fn test_metadata_failure_propagates_unwrapped() {
    let storage = unreachable_storage();
    assert!(matches!(
        storage.file_exists("clip").await,
        Err(StorageError::Backend(_))
    ));
    assert!(matches!(
        storage.get_file_info("clip").await,
        Err(StorageError::Backend(_))
    ));
}

#[tokio::test]
async fn test_operation_errors_name_the_operation() {
    let storage = unreachable_storage();

    assert!(matches!(
        storage.upload_file("clip", vec![0u8; 16], None).await,
        Err(StorageError::UploadFailed { ref key, .. }) if key == "clip.mp3"
    ));
    assert!(matches!(
        storage.delete_file("clip").await,
        Err(StorageError::DeleteFailed { .. })
    ));
    assert!(matches!(
        storage.get_file_stream("clip").await,
        Err(StorageError::StreamFailed { .. })
    ));
    match storage.cleanup_files().await {
        Err(StorageError::CleanupFailed { removed, source }) => {
            assert!(removed.is_empty());
            assert!(matches!(*source, StorageError::ListFailed { .. }));
        }
        other => panic!("unexpected cleanup result: {:?}", other),
    }
}

#[test]
fn test_new_builds_client_without_network() {
    let config = StorageConfig::new(
        "AKIAEXAMPLE",
        "secret",
        "ap-south-1",
        "clips",
        "https://cdn.example.com/",
        None,
    )
    .unwrap();
    let storage = AudioStorage::new(&config).unwrap();
    assert_eq!(storage.bucket(), "clips");
    assert_eq!(
        storage.get_public_url("clip.mp3"),
        "https://cdn.example.com/clip.mp3"
    );
}
