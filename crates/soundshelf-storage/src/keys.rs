//! Key generation shared by every facade operation.
//!
//! Key format: the caller's name with `/` and `\` removed, surrounding
//! whitespace trimmed, and `.mp3` appended unless already present.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorBorrowed};
use object_store::path::Path;

use crate::error::{StorageError, StorageResult};

/// Suffix every stored audio key carries
pub const AUDIO_EXTENSION: &str = ".mp3";

const PATH_SEPARATORS: [char; 2] = ['/', '\\'];

/// Turn a caller-supplied name into a storage key.
///
/// Sanitizing an already sanitized key returns it unchanged. A name with
/// nothing left once separators are removed is rejected.
pub fn sanitize_key(name: &str) -> StorageResult<String> {
    let stripped: String = name
        .chars()
        .filter(|c| !PATH_SEPARATORS.contains(c))
        .collect();
    let stripped = stripped.trim();

    if stripped.is_empty() || stripped == AUDIO_EXTENSION {
        return Err(StorageError::InvalidKey(format!(
            "'{}' does not contain a usable file name",
            name
        )));
    }

    if is_audio_key(stripped) {
        Ok(stripped.to_string())
    } else {
        Ok(format!("{}{}", stripped, AUDIO_EXTENSION))
    }
}

/// Whether a listed object key belongs to the audio library
pub fn is_audio_key(key: &str) -> bool {
    key.ends_with(AUDIO_EXTENSION)
}

/// Public download URL for a key: `{base_url}/{key}`.
///
/// No escaping or sanitization is applied; pass a key that is already valid.
pub fn public_url(base_url: &str, key: &str) -> String {
    format!("{}/{}", base_url, key)
}

/// Object store location for a sanitized key.
///
/// The key is used verbatim, so the stored object name is exactly the key the
/// public URL is built from.
pub fn object_path(key: &str) -> StorageResult<Path> {
    Path::parse(key)
        .map_err(|e| StorageError::InvalidKey(format!("'{}' is not a valid object key: {}", key, e)))
}

/// Display ordering for file names using root-locale collation.
///
/// Names the collator considers equal fall back to byte order, so the order
/// is total and stable across listings.
pub struct NameOrder {
    collator: Option<CollatorBorrowed<'static>>,
}

impl NameOrder {
    pub fn new() -> Self {
        let collator = match Collator::try_new(Default::default(), Default::default()) {
            Ok(collator) => Some(collator),
            Err(e) => {
                tracing::warn!(error = %e, "Collation data unavailable, sorting case-insensitively");
                None
            }
        };
        NameOrder { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let collated = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase)),
        };
        collated.then_with(|| a.cmp(b))
    }
}

impl Default for NameOrder {
    fn default() -> Self {
        Self::new()
    }
}
