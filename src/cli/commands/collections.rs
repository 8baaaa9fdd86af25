use anyhow::Result;
use clap::Args;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};

pub async fn handle_collections(config: Config, format: OutputFormat) -> Result<()> {
    let store = super::connect_store(&config).await?;
    let collections = store.list_collections().await?;

    let formatter = get_formatter(format);
    println!("{}", formatter.format_collections(&collections));
    Ok(())
}

#[derive(Debug, Args)]
pub struct ItemsArgs {
    /// Slug of the collection to list
    pub slug: String,
}

pub async fn handle_items(args: ItemsArgs, config: Config, format: OutputFormat) -> Result<()> {
    let store = super::connect_store(&config).await?;
    let collection = store.get_collection_by_slug(&args.slug).await?;
    let items = store.list_items(collection.id).await?;

    let formatter = get_formatter(format);
    println!("{}", formatter.format_items(&items));
    Ok(())
}
