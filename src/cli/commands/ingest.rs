use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::signal;
use tokio::sync::watch;

use crate::cli::output::get_formatter;
use crate::models::{Config, ContentType, ItemMetadata, OutputFormat};
use crate::services::{IngestPipeline, TextChunker};

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Slug of the target collection
    pub slug: String,

    /// Text file to ingest
    pub file: PathBuf,

    /// Content type: tweet, thread, article, or custom
    #[arg(long, short = 't', default_value = "tweet")]
    pub content_type: String,

    /// Source label recorded in item metadata (defaults to the file name)
    #[arg(long)]
    pub source: Option<String>,

    /// Author recorded in item metadata
    #[arg(long)]
    pub author: Option<String>,
}

pub async fn handle_ingest(args: IngestArgs, config: Config, format: OutputFormat) -> Result<()> {
    let content_type: ContentType = args.content_type.parse()?;

    let raw_text = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let store = super::connect_store(&config).await?;
    let embedder = super::build_embedder(&config)?;
    let pipeline = IngestPipeline::new(
        TextChunker::from_config(&config.chunking),
        embedder,
        store,
    );

    let metadata = ItemMetadata {
        source: args.source.or_else(|| {
            args.file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        }),
        author: args.author,
        ..Default::default()
    };

    // Ctrl+C flips the cancellation flag; chunks stored so far stay stored
    // and the report marks the rest as cancelled.
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Embedding and storing chunks...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = pipeline
        .ingest_with_cancel(&args.slug, &raw_text, content_type, metadata, Some(&cancel_rx))
        .await?;

    spinner.finish_and_clear();

    let formatter = get_formatter(format);
    println!("{}", formatter.format_ingest_report(&report));

    if !report.is_complete() {
        std::process::exit(1);
    }
    Ok(())
}
