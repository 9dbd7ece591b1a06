//! Soundshelf Storage Library
//!
//! A facade over an object-storage bucket holding `.mp3` files. All calls are
//! independent request/response exchanges; the only local state is the
//! validated configuration.
//!
//! # Key format
//!
//! Every name passed to the facade is sanitized before use: path separators
//! are removed and a `.mp3` suffix is enforced. See the `keys` module.
//!
//! # Error convention
//!
//! Not-found is a value (`Ok(false)` / `Ok(None)`), never an error. Every other
//! failure is returned as a [`StorageError`] naming the operation, except for
//! [`AudioStorage::get_bucket_stats`] and [`AudioStorage::test_connection`]
//! which log the failure and fall back to a zero/`false` result.

pub mod error;
pub mod facade;
pub mod keys;
pub mod s3;
pub mod stream;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use facade::{AudioStorage, DEFAULT_CONTENT_TYPE, MAX_LIST_KEYS, MIN_VALID_FILE_SIZE};
pub use keys::{public_url, sanitize_key, NameOrder};
pub use soundshelf_core::{AudioFile, BucketStats, FileInfo, StorageConfig};
pub use stream::AudioStream;
