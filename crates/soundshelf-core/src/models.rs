//! Plain records returned by storage queries. None of these are persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// An audio object as reported by a bucket listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioFile {
    /// Storage object key, always ending in `.mp3`
    pub key: String,
    /// Display name; identical to the key
    pub name: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    /// Public download URL derived from the key
    pub url: String,
}

/// Metadata lookup result for a single object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// Aggregate counts over the audio files of a bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketStats {
    pub file_count: usize,
    pub total_size: u64,
}

impl BucketStats {
    pub fn from_files(files: &[AudioFile]) -> Self {
        BucketStats {
            file_count: files.len(),
            total_size: files.iter().map(|f| f.size).sum(),
        }
    }
}
