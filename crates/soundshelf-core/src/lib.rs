//! Soundshelf Core Library
//!
//! This crate provides the configuration, error types and plain data records
//! shared by the storage facade and the command-line client.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{StorageConfig, DEFAULT_REGION};
pub use error::ConfigError;
pub use models::{AudioFile, BucketStats, FileInfo};
