use anyhow::{Result, bail};
use clap::Args;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Slug of the collection
    pub slug: String,

    /// Deactivate instead of deleting; items are kept
    #[arg(long)]
    pub deactivate: bool,

    /// Skip the confirmation requirement for physical deletion
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub async fn handle_delete(args: DeleteArgs, config: Config, format: OutputFormat) -> Result<()> {
    let store = super::connect_store(&config).await?;
    let collection = store.get_collection_by_slug(&args.slug).await?;
    let formatter = get_formatter(format);

    if args.deactivate {
        store.set_active(collection.id, false).await?;
        println!(
            "{}",
            formatter.format_message(&format!("Deactivated collection \"{}\"", collection.slug))
        );
        return Ok(());
    }

    let item_count = store.count_items(collection.id).await?;
    if !args.yes {
        bail!(
            "deleting \"{}\" removes {} item(s) permanently; pass --yes to confirm, \
             or --deactivate to keep the data",
            collection.slug,
            item_count
        );
    }

    store.delete_collection(collection.id).await?;
    println!(
        "{}",
        formatter.format_message(&format!(
            "Deleted collection \"{}\" and {} item(s)",
            collection.slug, item_count
        ))
    );
    Ok(())
}
