//! Query path: embed free text and rank one collection's items against it.

use std::sync::Arc;
use std::time::Instant;

use crate::error::SearchError;
use crate::models::QueryResults;
use crate::services::embedding::Embedder;
use crate::services::store::ContentStore;

/// Independent of ingestion: takes free text, embeds it once, and runs the
/// store's ranked search. Any error fails the whole call; retries are the
/// caller's policy.
pub struct QueryEngine {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn ContentStore>,
}

impl QueryEngine {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn ContentStore>) -> Self {
        Self { embedder, store }
    }

    pub async fn query(
        &self,
        slug: &str,
        text: &str,
        limit: usize,
        min_score: Option<f32>,
    ) -> Result<QueryResults, SearchError> {
        if text.trim().is_empty() {
            return Err(SearchError::InvalidQuery("empty query text".to_string()));
        }

        let started = Instant::now();
        let collection = self.store.get_collection_by_slug(slug).await?;
        let vector = self.embedder.embed(text).await?;
        let hits = self
            .store
            .search(collection.id, &vector, limit, min_score)
            .await?;

        Ok(QueryResults::new(
            text.to_string(),
            collection.slug,
            hits,
            started.elapsed().as_millis() as u64,
        ))
    }
}
