//! In-process content store.
//!
//! Enforces the same invariants as the Postgres backend (slug uniqueness,
//! dimension checks, cascade delete) without a database, and ranks with the
//! in-process similarity engine. Serves as the test double for the pipeline
//! and as the ranking oracle for the `<=>`-based query path.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ContentStore, check_dimension};
use crate::error::StoreError;
use crate::models::{
    Collection, ContentItem, NewCollection, NewContentItem, SearchHit, is_valid_slug,
};
use crate::services::similarity;

#[derive(Default)]
struct Inner {
    /// Insertion-ordered so slug races and tie-breaks stay deterministic.
    collections: Vec<Collection>,
    /// Items per collection in insertion order.
    items: HashMap<Uuid, Vec<ContentItem>>,
}

pub struct MemoryStore {
    dimension: usize,
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            inner: RwLock::new(Inner::default()),
        }
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }

    async fn create_collection(&self, new: NewCollection) -> Result<Collection, StoreError> {
        if !is_valid_slug(&new.slug) {
            return Err(StoreError::InvalidSlug(new.slug));
        }

        // Uniqueness check and insert under one write lock: a race on the
        // same slug yields exactly one winner.
        let mut inner = self.inner.write().await;
        if inner.collections.iter().any(|c| c.slug == new.slug) {
            return Err(StoreError::DuplicateSlug(new.slug));
        }

        let now = Utc::now();
        let collection = Collection {
            id: Uuid::new_v4(),
            name: new.name,
            slug: new.slug,
            system_prompt: new.system_prompt,
            research_prompt: new.research_prompt,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        };
        inner.items.insert(collection.id, Vec::new());
        inner.collections.push(collection.clone());
        Ok(collection)
    }

    async fn get_collection_by_slug(&self, slug: &str) -> Result<Collection, StoreError> {
        let inner = self.inner.read().await;
        inner
            .collections
            .iter()
            .find(|c| c.slug == slug)
            .cloned()
            .ok_or_else(|| StoreError::CollectionNotFound(slug.to_string()))
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.collections.iter().rev().cloned().collect())
    }

    async fn set_active(&self, collection_id: Uuid, active: bool) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let collection = inner
            .collections
            .iter_mut()
            .find(|c| c.id == collection_id)
            .ok_or_else(|| StoreError::CollectionNotFound(collection_id.to_string()))?;
        collection.is_active = active;
        collection.updated_at = Utc::now();
        Ok(())
    }

    async fn add_item(&self, new: NewContentItem) -> Result<ContentItem, StoreError> {
        check_dimension(self.dimension, &new.embedding)?;

        let mut inner = self.inner.write().await;
        if !inner.collections.iter().any(|c| c.id == new.collection_id) {
            return Err(StoreError::CollectionNotFound(
                new.collection_id.to_string(),
            ));
        }

        let now = Utc::now();
        let item = ContentItem {
            id: Uuid::new_v4(),
            collection_id: new.collection_id,
            content: new.content,
            content_type: new.content_type,
            embedding: new.embedding,
            metadata: new.metadata,
            created_at: now,
            updated_at: now,
        };
        inner
            .items
            .entry(new.collection_id)
            .or_default()
            .push(item.clone());
        Ok(item)
    }

    async fn list_items(&self, collection_id: Uuid) -> Result<Vec<ContentItem>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .get(&collection_id)
            .map(|items| items.iter().rev().cloned().collect())
            .unwrap_or_default())
    }

    async fn count_items(&self, collection_id: Uuid) -> Result<u64, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .get(&collection_id)
            .map(|items| items.len() as u64)
            .unwrap_or(0))
    }

    async fn delete_collection(&self, collection_id: Uuid) -> Result<(), StoreError> {
        // No native cascade here: delete the items first, then the
        // collection, under one write lock.
        let mut inner = self.inner.write().await;
        let position = inner
            .collections
            .iter()
            .position(|c| c.id == collection_id)
            .ok_or_else(|| StoreError::CollectionNotFound(collection_id.to_string()))?;
        inner.items.remove(&collection_id);
        inner.collections.remove(position);
        Ok(())
    }

    async fn search(
        &self,
        collection_id: Uuid,
        query_vector: &[f32],
        limit: usize,
        min_score: Option<f32>,
    ) -> Result<Vec<SearchHit>, StoreError> {
        check_dimension(self.dimension, query_vector)?;

        let inner = self.inner.read().await;
        let candidates: Vec<(SearchHit, Vec<f32>)> = inner
            .items
            .get(&collection_id)
            .map(|items| {
                items
                    .iter()
                    .map(|item| {
                        (
                            SearchHit {
                                item_id: item.id,
                                score: 0.0,
                                content: item.content.clone(),
                                content_type: item.content_type,
                            },
                            item.embedding.clone(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        let ranked = similarity::top_k(query_vector, candidates, limit, min_score)?;
        Ok(ranked
            .into_iter()
            .map(|(mut hit, score)| {
                hit.score = score;
                hit
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
