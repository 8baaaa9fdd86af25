//! CLI surface: thin orchestration around the core services.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::models::OutputFormat;

/// Collection-scoped RAG content store with similarity search.
#[derive(Debug, Parser)]
#[command(name = "ragstore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(
        long,
        short = 'f',
        global = true,
        help = "Output format: text, json, or markdown"
    )]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check embedding API and store connectivity
    Status,

    /// Create a new collection
    Create(commands::CreateArgs),

    /// Chunk, embed, and store a text file into a collection
    Ingest(commands::IngestArgs),

    /// Similarity-search a collection with free text
    Query(commands::QueryArgs),

    /// List collections
    Collections,

    /// List a collection's content items
    Items(commands::ItemsArgs),

    /// Delete or deactivate a collection
    Delete(commands::DeleteArgs),
}
