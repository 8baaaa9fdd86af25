use anyhow::{Result, bail};
use clap::Args;

use crate::cli::output::get_formatter;
use crate::models::{Config, NewCollection, OutputFormat, is_valid_slug};

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Human-readable collection name
    pub name: String,

    /// URL-safe lookup key (letters, digits, hyphens, underscores)
    pub slug: String,

    /// System prompt for the answering model
    #[arg(long)]
    pub system_prompt: Option<String>,

    /// Prompt for the secondary research provider
    #[arg(long)]
    pub research_prompt: Option<String>,

    /// Create the collection inactive
    #[arg(long)]
    pub inactive: bool,
}

pub async fn handle_create(args: CreateArgs, config: Config, format: OutputFormat) -> Result<()> {
    // Validate up front; the store re-validates defensively.
    if !is_valid_slug(&args.slug) {
        bail!(
            "invalid slug {:?}: use only letters, digits, hyphens, and underscores",
            args.slug
        );
    }

    let store = super::connect_store(&config).await?;

    let mut new = NewCollection::new(args.name, args.slug);
    new.system_prompt = args.system_prompt;
    new.research_prompt = args.research_prompt;
    new.is_active = !args.inactive;

    let collection = store.create_collection(new).await?;

    let formatter = get_formatter(format);
    println!(
        "{}",
        formatter.format_message(&format!(
            "Created collection \"{}\" (slug: {})",
            collection.name, collection.slug
        ))
    );
    Ok(())
}
