//! Shared helpers for the soundshelf command-line client.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use soundshelf_storage::AudioStorage;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Print a value as pretty JSON on stdout
pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{}", out);
    Ok(())
}

/// Storage name for an uploaded file: the explicit name if given, else the file stem.
pub fn upload_name(path: &Path, explicit: Option<&str>) -> Option<String> {
    match explicit {
        Some(name) => Some(name.to_string()),
        None => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty()),
    }
}

/// Content type for an uploaded file, guessed from its extension.
///
/// Non-audio guesses are ignored so the storage default applies.
pub fn guess_content_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .filter(|mime| mime.type_() == mime_guess::mime::AUDIO)
        .map(|mime| mime.essence_str().to_string())
}

/// Download `name` into a new file at `dest`, returning the bytes written.
///
/// The object is opened before `dest` is created, and a partially written
/// file is removed if the transfer fails.
pub async fn download_file(storage: &AudioStorage, name: &str, dest: &Path) -> anyhow::Result<u64> {
    let stream = storage.get_file_stream(name).await?;

    let mut file = tokio::fs::File::create(dest)
        .await
        .with_context(|| format!("Failed to create {}", dest.display()))?;

    match stream.copy_to(&mut file).await {
        Ok(written) => Ok(written),
        Err(e) => {
            drop(file);
            if let Err(remove_err) = tokio::fs::remove_file(dest).await {
                tracing::warn!(
                    error = %remove_err,
                    path = %dest.display(),
                    "Failed to remove partial download"
                );
            }
            Err(e.into())
        }
    }
}

/// Human readable byte count
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}
