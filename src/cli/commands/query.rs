use anyhow::Result;
use clap::Args;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};
use crate::services::QueryEngine;
use crate::utils::retry::{RetryConfig, with_retry};

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Slug of the collection to search
    pub slug: String,

    /// Free-text query
    pub text: String,

    /// Maximum number of results
    #[arg(long, short = 'k')]
    pub limit: Option<usize>,

    /// Minimum similarity score (inclusive)
    #[arg(long)]
    pub min_score: Option<f32>,
}

pub async fn handle_query(args: QueryArgs, config: Config, format: OutputFormat) -> Result<()> {
    let store = super::connect_store(&config).await?;
    let embedder = super::build_embedder(&config)?;
    let engine = QueryEngine::new(embedder, store);

    let limit = args.limit.unwrap_or(config.search.default_limit);
    let min_score = args.min_score.or(config.search.default_min_score);

    // Transient provider and store failures are retried here; the core
    // itself never retries.
    let results = with_retry(&RetryConfig::default(), || {
        engine.query(&args.slug, &args.text, limit, min_score)
    })
    .await?;

    let formatter = get_formatter(format);
    println!("{}", formatter.format_query_results(&results));
    Ok(())
}
