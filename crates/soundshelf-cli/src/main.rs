//! Soundshelf CLI — manage the audio files of a storage bucket.
//!
//! Set AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, S3_BUCKET_NAME and S3_BASE_URL
//! (AWS_REGION and S3_ENDPOINT are optional). A `.env` file is read if present.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use soundshelf_cli::{
    download_file, format_size, guess_content_type, init_tracing, print_json, upload_name,
};
use soundshelf_storage::AudioStorage;

#[derive(Parser)]
#[command(name = "soundshelf", about = "Audio file storage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an audio file
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Name to store the file under (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,
        /// Content type (defaults to a guess from the extension, then audio/mpeg)
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Delete an audio file
    Delete {
        /// File name
        name: String,
    },
    /// List audio files sorted by name
    List,
    /// Check whether an audio file exists
    Exists {
        /// File name
        name: String,
    },
    /// Show size and modification time of an audio file
    Info {
        /// File name
        name: String,
    },
    /// Print the public URL for a key
    Url {
        /// Storage key, used as-is
        key: String,
    },
    /// Download an audio file to a local path
    Download {
        /// File name
        name: String,
        /// Destination path
        dest: PathBuf,
    },
    /// Count audio files and their total size
    Stats,
    /// Remove audio files smaller than 1 KB
    Cleanup,
    /// Verify connectivity and credentials
    TestConnection,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let storage = AudioStorage::from_env().context("Failed to create storage client")?;

    match cli.command {
        Commands::Upload {
            file,
            name,
            content_type,
        } => {
            let name = upload_name(&file, name.as_deref())
                .with_context(|| format!("Cannot derive a file name from {}", file.display()))?;
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let content_type = content_type.or_else(|| guess_content_type(&file));
            let size = data.len() as u64;
            let url = storage
                .upload_file(&name, data, content_type.as_deref())
                .await?;
            print_json(&serde_json::json!({
                "url": url,
                "size": size,
                "sizeHuman": format_size(size),
            }))?;
        }
        Commands::Delete { name } => {
            storage.delete_file(&name).await?;
            print_json(&serde_json::json!({ "success": true, "message": format!("{} deleted", name) }))?;
        }
        Commands::List => {
            let files = storage.list_files().await?;
            print_json(&files)?;
        }
        Commands::Exists { name } => {
            let exists = storage.file_exists(&name).await?;
            print_json(&serde_json::json!({ "name": name, "exists": exists }))?;
        }
        Commands::Info { name } => {
            let info = storage.get_file_info(&name).await?;
            print_json(&info)?;
        }
        Commands::Url { key } => {
            print_json(&serde_json::json!({ "url": storage.get_public_url(&key) }))?;
        }
        Commands::Download { name, dest } => {
            let written = download_file(&storage, &name, &dest).await?;
            print_json(&serde_json::json!({
                "path": dest.display().to_string(),
                "size": written,
                "sizeHuman": format_size(written),
            }))?;
        }
        Commands::Stats => {
            let stats = storage.get_bucket_stats().await;
            print_json(&serde_json::json!({
                "fileCount": stats.file_count,
                "totalSize": stats.total_size,
                "totalSizeHuman": format_size(stats.total_size),
            }))?;
        }
        Commands::Cleanup => {
            let removed = storage.cleanup_files().await?;
            tracing::info!(removed_count = removed.len(), "Cleanup finished");
            print_json(&removed)?;
        }
        Commands::TestConnection => {
            let ok = storage.test_connection().await;
            print_json(&serde_json::json!({ "bucket": storage.bucket(), "connected": ok }))?;
            if !ok {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
