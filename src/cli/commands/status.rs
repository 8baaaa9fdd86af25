use anyhow::Result;

use crate::cli::output::{StatusInfo, get_formatter};
use crate::models::{Config, OutputFormat};

pub async fn handle_status(config: Config, format: OutputFormat) -> Result<()> {
    let mut status = StatusInfo {
        embedding_api: config.embedding.api_url.clone(),
        embedding_model: config.embedding.model.clone(),
        dimension: config.embedding.dimension,
        api_key_present: config.embedding.api_key.is_some(),
        store_connected: false,
        collections: 0,
        items: 0,
    };

    // Store problems degrade the report rather than failing the command.
    if let Ok(store) = super::connect_store(&config).await
        && store.health_check().await.unwrap_or(false)
    {
        status.store_connected = true;
        if let Ok(collections) = store.list_collections().await {
            status.collections = collections.len() as u64;
            for collection in &collections {
                status.items += store.count_items(collection.id).await.unwrap_or(0);
            }
        }
    }

    let formatter = get_formatter(format);
    println!("{}", formatter.format_status(&status));
    Ok(())
}
