//! NavHub Bookmark Import CLI
//!
//! Drives the two-phase import against a local database file.
//!
//! # Usage
//!
//! ```bash
//! # Compute a plan and write it to plan.json (nothing is written to the DB)
//! navhub-import preview bookmarks.html --target auto --out plan.json
//!
//! # Apply the reviewed plan
//! navhub-import apply plan.json
//!
//! # One-shot import (optionally --dry-run)
//! navhub-import import bookmarks.html --mode replace --target menu:3
//! ```
//!
//! # Environment Variables
//!
//! - `NAVHUB_DB_PATH`: Database file (default: `~/.navhub/database/navhub.db`)
//! - `NAVHUB_MAX_FILE_SIZE`, `NAVHUB_BATCH_SIZE`, `NAVHUB_FALLBACK_MENU`,
//!   `NAVHUB_SAMPLE_LIMIT`: import settings
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")
//!
//! # Exit Status
//!
//! `0` on success, `2` when the request is rejected (bad file, mode or
//! target), `1` when storage fails.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use navhub_core::db::{DatabaseService, NavStore, TursoStore};
use navhub_core::services::{
    ApplyRequest, ImportEnvelope, ImportService, ImportServiceError, LegacyImportRequest,
    PreviewRequest, PreviewResponse, UploadedFile,
};
use navhub_core::ImportConfig;

#[derive(Parser)]
#[command(name = "navhub-import")]
#[command(version, about = "Import browser bookmark exports into NavHub")]
struct Cli {
    /// Database file (overrides NAVHUB_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a bookmark file and print the import plan without writing
    Preview {
        /// Netscape bookmark HTML export
        file: PathBuf,

        /// "merge" or "replace"
        #[arg(long, default_value = "merge")]
        mode: String,

        /// "auto" or "menu:<id>"
        #[arg(long, default_value = "auto")]
        target: String,

        /// Write the preview JSON here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Apply a plan previously written by `preview`
    Apply {
        /// Preview JSON produced by `preview --out`
        preview: PathBuf,
    },

    /// Preview and apply in one step
    Import {
        file: PathBuf,

        #[arg(long, default_value = "merge")]
        mode: String,

        #[arg(long, default_value = "auto")]
        target: String,

        /// Stop after computing the plan
        #[arg(long)]
        dry_run: bool,
    },
}

/// `--db`, then `NAVHUB_DB_PATH`, then `~/.navhub/database/navhub.db`
fn resolve_db_path(flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(path) = env::var_os("NAVHUB_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    let home_dir =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Failed to get home directory"))?;
    Ok(home_dir.join(".navhub").join("database").join("navhub.db"))
}

fn read_upload(path: &Path) -> anyhow::Result<UploadedFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadedFile::new(name, bytes))
}

fn exit_code<T>(result: &Result<T, ImportServiceError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) if e.is_validation() => ExitCode::from(2),
        Err(_) => ExitCode::FAILURE,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let db_path = resolve_db_path(cli.db)?;
    tracing::info!("Database: {}", db_path.display());

    let db = Arc::new(DatabaseService::new(db_path).await?);
    let store: Arc<dyn NavStore> = Arc::new(TursoStore::new(db));
    let service = ImportService::new(store, ImportConfig::from_env())?;

    let code = match cli.command {
        Commands::Preview {
            file,
            mode,
            target,
            out,
        } => {
            let result = service
                .preview(PreviewRequest {
                    file: Some(read_upload(&file)?),
                    mode,
                    target,
                })
                .await;
            let code = exit_code(&result);

            match (result, out) {
                (Ok(preview), Some(out)) => {
                    std::fs::write(&out, serde_json::to_string_pretty(&preview)?)
                        .with_context(|| format!("Failed to write {}", out.display()))?;
                    tracing::info!(
                        preview_id = %preview.preview_id,
                        "Preview written to {}",
                        out.display()
                    );
                    print_json(&ImportEnvelope::success(preview.summary))?;
                }
                (result, _) => print_json(&ImportEnvelope::from(result))?,
            }
            code
        }
        Commands::Apply { preview } => {
            let raw = std::fs::read_to_string(&preview)
                .with_context(|| format!("Failed to read {}", preview.display()))?;
            let preview: PreviewResponse =
                serde_json::from_str(&raw).context("Failed to parse preview JSON")?;

            let result = service.apply(ApplyRequest::from_preview(&preview)).await;
            let code = exit_code(&result);
            print_json(&ImportEnvelope::from(result))?;
            code
        }
        Commands::Import {
            file,
            mode,
            target,
            dry_run,
        } => {
            let response = service
                .import_bookmarks(LegacyImportRequest {
                    file: Some(read_upload(&file)?),
                    mode,
                    target,
                    dry_run,
                })
                .await;
            print_json(&response)?;
            if response.ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    };

    Ok(code)
}
