//! Command handlers.

mod collections;
mod create;
mod delete;
mod ingest;
mod query;
mod status;

pub use collections::{ItemsArgs, handle_collections, handle_items};
pub use create::{CreateArgs, handle_create};
pub use delete::{DeleteArgs, handle_delete};
pub use ingest::{IngestArgs, handle_ingest};
pub use query::{QueryArgs, handle_query};
pub use status::handle_status;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::models::Config;
use crate::services::{ContentStore, Embedder, EmbeddingClient, PgStore};

/// Connect to the configured Postgres store.
pub(crate) async fn connect_store(config: &Config) -> Result<Arc<dyn ContentStore>> {
    let store = PgStore::connect(&config.store, config.embedding.dimension)
        .await
        .context("failed to connect to content store")?;
    Ok(Arc::new(store))
}

/// Build the embedding client from config.
pub(crate) fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    let client =
        EmbeddingClient::new(&config.embedding).context("failed to create embedding client")?;
    Ok(Arc::new(client))
}
