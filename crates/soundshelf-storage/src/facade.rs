//! Audio storage facade
//!
//! Translates audio-library operations into object-store calls against a
//! single bucket and normalizes the results.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use chrono::Utc;
use futures::{StreamExt, TryStreamExt};
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::{
    Attribute, Attributes, Error as ObjectStoreError, ObjectMeta, ObjectStore, ObjectStoreExt,
};
use soundshelf_core::{AudioFile, BucketStats, FileInfo, StorageConfig};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{StorageError, StorageResult};
use crate::keys::{is_audio_key, object_path, public_url, sanitize_key, NameOrder};
use crate::s3;
use crate::stream::AudioStream;

/// Content type used when the caller does not supply one
pub const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";

/// Upper bound on objects read by a single listing
pub const MAX_LIST_KEYS: usize = 1000;

/// Files smaller than this are treated as corrupted or empty uploads
pub const MIN_VALID_FILE_SIZE: u64 = 1024;

const CACHE_CONTROL: &str = "max-age=31536000";
const UPLOADED_BY_KEY: &str = "uploaded-by";
const UPLOADED_BY: &str = "soundshelf";
const UPLOAD_DATE_KEY: &str = "upload-date";

// Payloads above one part are sent as a multipart upload.
const MULTIPART_PART_SIZE: usize = 5 * 1024 * 1024;

/// Audio file storage backed by an object store bucket
#[derive(Clone)]
pub struct AudioStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    base_url: String,
}

impl AudioStorage {
    /// Create an S3-backed instance from the process environment.
    ///
    /// Missing or invalid settings surface as [`StorageError::Config`].
    pub fn from_env() -> StorageResult<Self> {
        let config = StorageConfig::from_env()?;
        Self::new(&config)
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> StorageResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = StorageConfig::from_lookup(lookup)?;
        Self::new(&config)
    }

    /// Create an S3-backed instance from validated configuration
    pub fn new(config: &StorageConfig) -> StorageResult<Self> {
        let store = s3::build_store(config)?;
        Ok(Self::with_store(store, config.bucket_name(), config.base_url()))
    }

    /// Wrap an existing object store.
    ///
    /// # Arguments
    /// * `store` - Any `object_store` backend; the bucket is implied by the store
    /// * `bucket` - Bucket name, used for logging only
    /// * `base_url` - Public URL prefix for download links
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        AudioStorage {
            store,
            bucket: bucket.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload an audio file and return its public URL.
    ///
    /// Large payloads are sent as a multipart upload. Every object carries a
    /// one-year cache-control directive and uploader/upload-date metadata.
    pub async fn upload_file(
        &self,
        name: &str,
        data: impl Into<Bytes>,
        content_type: Option<&str>,
    ) -> StorageResult<String> {
        let (key, location) = locate(name)?;
        let data: Bytes = data.into();
        let size = data.len() as u64;
        let content_type = content_type.unwrap_or(DEFAULT_CONTENT_TYPE);
        let start = Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        attributes.insert(Attribute::CacheControl, CACHE_CONTROL.into());
        attributes.insert(Attribute::Metadata(UPLOADED_BY_KEY.into()), UPLOADED_BY.into());
        attributes.insert(
            Attribute::Metadata(UPLOAD_DATE_KEY.into()),
            Utc::now().to_rfc3339().into(),
        );

        let mut writer =
            BufWriter::with_capacity(Arc::clone(&self.store), location, MULTIPART_PART_SIZE)
                .with_attributes(attributes);

        let written = match writer.write_all(&data).await {
            Ok(()) => writer.shutdown().await,
            Err(e) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(
                        error = %abort_err,
                        key = %key,
                        "Failed to abort partial upload"
                    );
                }
                Err(e)
            }
        };

        written.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Audio upload failed"
            );
            StorageError::UploadFailed {
                key: key.clone(),
                source: Box::new(e),
            }
        })?;

        let url = self.get_public_url(&key);

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Audio upload successful"
        );

        Ok(url)
    }

    /// Delete an audio file. Deleting a missing file succeeds.
    pub async fn delete_file(&self, name: &str) -> StorageResult<()> {
        let (key, location) = locate(name)?;
        self.delete_location(key, &location).await
    }

    async fn delete_location(&self, key: String, location: &Path) -> StorageResult<()> {
        let start = Instant::now();

        match self.store.delete(location).await {
            Ok(()) => {}
            Err(ObjectStoreError::NotFound { .. }) => {
                tracing::debug!(bucket = %self.bucket, key = %key, "Delete of missing file");
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Audio delete failed"
                );
                return Err(StorageError::DeleteFailed { key, source: e });
            }
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Audio delete successful"
        );

        Ok(())
    }

    /// List `.mp3` files sorted by name.
    ///
    /// At most [`MAX_LIST_KEYS`] objects are read from the bucket; anything
    /// beyond that is not returned.
    pub async fn list_files(&self) -> StorageResult<Vec<AudioFile>> {
        let objects = self.list_audio_objects().await?;
        Ok(objects.into_iter().map(|meta| self.audio_file(meta)).collect())
    }

    async fn list_audio_objects(&self) -> StorageResult<Vec<ObjectMeta>> {
        let start = Instant::now();

        let objects: Vec<ObjectMeta> = self
            .store
            .list(None)
            .take(MAX_LIST_KEYS)
            .try_collect()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Audio listing failed"
                );
                StorageError::ListFailed { source: e }
            })?;

        let listed = objects.len();
        let mut audio: Vec<ObjectMeta> = objects
            .into_iter()
            .filter(|meta| is_audio_key(meta.location.as_ref()))
            .collect();
        let order = NameOrder::new();
        audio.sort_by(|a, b| order.compare(a.location.as_ref(), b.location.as_ref()));

        tracing::debug!(
            bucket = %self.bucket,
            listed,
            audio_files = audio.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Audio listing complete"
        );

        Ok(audio)
    }

    /// Whether an audio file exists.
    ///
    /// Only a not-found response yields `false`; any other failure is returned
    /// unchanged as [`StorageError::Backend`].
    pub async fn file_exists(&self, name: &str) -> StorageResult<bool> {
        Ok(self.head_audio(name).await?.is_some())
    }

    /// Size and modification time of an audio file, `None` when it is missing.
    pub async fn get_file_info(&self, name: &str) -> StorageResult<Option<FileInfo>> {
        Ok(self.head_audio(name).await?.map(|meta| FileInfo {
            size: meta.size,
            last_modified: meta.last_modified,
        }))
    }

    /// Open an audio file for streaming reads.
    pub async fn get_file_stream(&self, name: &str) -> StorageResult<AudioStream> {
        let (key, location) = locate(name)?;

        let result = self.store.get(&location).await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                "Opening audio stream failed"
            );
            StorageError::StreamFailed {
                key: key.clone(),
                source: e,
            }
        })?;

        let size = result.meta.size;
        tracing::debug!(bucket = %self.bucket, key = %key, size_bytes = size, "Audio stream opened");

        Ok(AudioStream::new(key, size, result.into_stream()))
    }

    /// Stream an audio file into `writer`, returning the number of bytes copied.
    pub async fn download_to<W>(&self, name: &str, writer: &mut W) -> StorageResult<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let stream = self.get_file_stream(name).await?;
        stream.copy_to(writer).await
    }

    /// Public download URL for an already sanitized key
    pub fn get_public_url(&self, key: &str) -> String {
        public_url(&self.base_url, key)
    }

    /// File count and total size of the audio library.
    ///
    /// A failed listing is logged and reported as zero files, so an empty
    /// bucket and an unreachable one look the same to the caller.
    pub async fn get_bucket_stats(&self) -> BucketStats {
        match self.list_files().await {
            Ok(files) => BucketStats::from_files(&files),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    bucket = %self.bucket,
                    "Bucket stats unavailable, reporting zero"
                );
                BucketStats::default()
            }
        }
    }

    /// Delete every audio file smaller than [`MIN_VALID_FILE_SIZE`].
    ///
    /// Returns the removed keys. Each listed object is deleted at its own
    /// location, one at a time in name order; if one fails, the ones before it
    /// stay deleted and are reported in [`StorageError::CleanupFailed`].
    pub async fn cleanup_files(&self) -> StorageResult<Vec<String>> {
        let start = Instant::now();

        let objects = self
            .list_audio_objects()
            .await
            .map_err(|e| StorageError::CleanupFailed {
                removed: Vec::new(),
                source: Box::new(e),
            })?;

        let mut removed = Vec::new();
        for meta in objects.into_iter().filter(|m| m.size < MIN_VALID_FILE_SIZE) {
            let key = meta.location.to_string();
            if let Err(e) = self.delete_location(key.clone(), &meta.location).await {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    removed_count = removed.len(),
                    "Cleanup aborted"
                );
                return Err(StorageError::CleanupFailed {
                    removed,
                    source: Box::new(e),
                });
            }
            tracing::debug!(key = %key, size_bytes = meta.size, "Removed undersized file");
            removed.push(key);
        }

        tracing::info!(
            bucket = %self.bucket,
            removed_count = removed.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cleanup complete"
        );

        Ok(removed)
    }

    /// Check connectivity and credentials with a single-object listing.
    ///
    /// Only the first listing page is requested and the stream is dropped after
    /// one entry. `object_store` does not expose a page size through
    /// `ObjectStore`, so the service may still return up to a full page of
    /// keys in that one response.
    pub async fn test_connection(&self) -> bool {
        match self.store.list(None).next().await {
            None | Some(Ok(_)) => {
                tracing::debug!(bucket = %self.bucket, "Storage connection ok");
                true
            }
            Some(Err(e)) => {
                tracing::warn!(
                    error = %e,
                    bucket = %self.bucket,
                    "Storage connection test failed"
                );
                false
            }
        }
    }

    async fn head_audio(&self, name: &str) -> StorageResult<Option<ObjectMeta>> {
        let (key, location) = locate(name)?;

        match self.store.head(&location).await {
            Ok(meta) => Ok(Some(meta)),
            Err(ObjectStoreError::NotFound { .. }) => {
                tracing::debug!(bucket = %self.bucket, key = %key, "Audio file not found");
                Ok(None)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "Audio metadata lookup failed"
                );
                Err(StorageError::Backend(e))
            }
        }
    }

    fn audio_file(&self, meta: ObjectMeta) -> AudioFile {
        let key = meta.location.to_string();
        AudioFile {
            url: self.get_public_url(&key),
            name: key.clone(),
            key,
            size: meta.size,
            last_modified: meta.last_modified,
        }
    }
}

/// Sanitized key and its object store location
fn locate(name: &str) -> StorageResult<(String, Path)> {
    let key = sanitize_key(name)?;
    let location = object_path(&key)?;
    Ok((key, location))
}
