//! Content store abstraction.
//!
//! The durable mapping from collections to their content items and vectors.
//! Two backends implement the same contract: [`PgStore`] (PostgreSQL +
//! pgvector, the shipped path) and [`MemoryStore`] (in-process, used as the
//! test double and ranking oracle).

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Collection, ContentItem, NewCollection, NewContentItem, SearchHit};

/// Durable store of collections and their embedded content items.
///
/// Every write validates that vectors match the store's fixed dimension, and
/// slug uniqueness is atomic with respect to concurrent creators: a race on
/// one slug yields exactly one success and one `DuplicateSlug`.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Check connectivity to the backing store.
    async fn health_check(&self) -> Result<bool, StoreError>;

    /// Create a collection. Fails with `InvalidSlug` on malformed slugs and
    /// `DuplicateSlug` if the slug is already taken (exact, case-sensitive).
    async fn create_collection(&self, new: NewCollection) -> Result<Collection, StoreError>;

    /// Look up a collection by slug, exact match.
    async fn get_collection_by_slug(&self, slug: &str) -> Result<Collection, StoreError>;

    /// All collections, most recently created first.
    async fn list_collections(&self) -> Result<Vec<Collection>, StoreError>;

    /// Flip the active flag; the normal alternative to physical deletion.
    async fn set_active(&self, collection_id: Uuid, active: bool) -> Result<(), StoreError>;

    /// Store one embedded chunk. Fails with `DimensionMismatch` if the
    /// vector width differs from the store's dimension, and
    /// `CollectionNotFound` if the owning collection does not exist.
    async fn add_item(&self, new: NewContentItem) -> Result<ContentItem, StoreError>;

    /// Items of one collection, most recently created first.
    async fn list_items(&self, collection_id: Uuid) -> Result<Vec<ContentItem>, StoreError>;

    /// Number of items in one collection.
    async fn count_items(&self, collection_id: Uuid) -> Result<u64, StoreError>;

    /// Delete a collection and, by cascade, every item it owns.
    async fn delete_collection(&self, collection_id: Uuid) -> Result<(), StoreError>;

    /// Rank a collection's items by cosine similarity to `query_vector`,
    /// best first, at most `limit` results, optionally dropping hits below
    /// `min_score`. Ties keep insertion order.
    async fn search(
        &self,
        collection_id: Uuid,
        query_vector: &[f32],
        limit: usize,
        min_score: Option<f32>,
    ) -> Result<Vec<SearchHit>, StoreError>;

    /// The fixed embedding width this store accepts.
    fn dimension(&self) -> usize;
}

/// Shared write-side validation for both backends.
pub(crate) fn check_dimension(expected: usize, vector: &[f32]) -> Result<(), StoreError> {
    if vector.len() != expected {
        return Err(StoreError::DimensionMismatch {
            expected,
            actual: vector.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dimension() {
        assert!(check_dimension(3, &[1.0, 2.0, 3.0]).is_ok());
        let err = check_dimension(3, &[1.0]).unwrap_err();
        match err {
            StoreError::DimensionMismatch { expected, actual } => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected: {other}"),
        }
    }
}
