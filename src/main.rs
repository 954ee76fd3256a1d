use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use rust_file_store::infrastructure::storage;
use rust_file_store::models::StoredFile;
use rust_file_store::utils::size::human_size;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Store a file and its info page with the configured storage backend.
///
/// The backend is chosen by STORAGE_BACKEND; its options come from
/// STORAGE_OPTIONS (JSON) and STORAGE_OPTION_<KEY> variables.
#[derive(Parser, Debug)]
#[command(name = "rust-file-store", version, about)]
struct Args {
    /// File to store
    path: PathBuf,

    /// Unique name of the upload, substituted into every path template
    #[arg(short, long)]
    name: String,

    /// Pre-rendered info page; a minimal one is generated when omitted
    #[arg(short, long)]
    info: Option<PathBuf>,
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn default_info_page(name: &str, size: u64) -> String {
    let name = escape_html(name);
    format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{name}</title></head>\
         <body><h1>{name}</h1><p>Size: {size}</p></body></html>\n",
        name = name,
        size = human_size(size),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_file_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let backend = storage::setup_storage().context("Invalid storage configuration")?;

    let info_html = match &args.info {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read info page {}", path.display()))?,
        None => {
            let size = tokio::fs::metadata(&args.path)
                .await
                .with_context(|| format!("Failed to stat {}", args.path.display()))?
                .len();
            default_info_page(&args.name, size)
        }
    };

    let file = StoredFile::open(&args.name, &args.path, info_html)
        .await
        .with_context(|| format!("Failed to open {}", args.path.display()))?;

    info!("📤 Storing '{}' ({})", args.name, human_size(file.size()));
    if let Err(e) = backend.store(file).await {
        error!("❌ Store failed: {}", e.internal_message());
        eprintln!("{}", e.display_message());
        std::process::exit(1);
    }

    info!("✅ Stored '{}' with {} backend", args.name, backend.name());
    Ok(())
}
