use async_trait::async_trait;
use chrono::Utc;
use pgvector::Vector;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use std::time::Duration;
use uuid::Uuid;

use super::{ContentStore, check_dimension};
use crate::error::StoreError;
use crate::models::{
    Collection, ContentItem, ContentType, ItemMetadata, NewCollection, NewContentItem, SearchHit,
    StoreConfig, is_valid_slug,
};

/// Postgres error codes for constraint violations.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL + pgvector backend.
///
/// Ranking is done store-side with the `<=>` cosine distance operator; the
/// unique slug constraint and the `ON DELETE CASCADE` foreign key carry the
/// uniqueness and ownership invariants.
pub struct PgStore {
    pool: PgPool,
    dimension: usize,
}

impl PgStore {
    /// Connect and ensure the schema exists.
    pub async fn connect(config: &StoreConfig, dimension: usize) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_max)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let store = Self { pool, dimension };
        store.check_pgvector_extension().await?;
        store.migrate().await?;
        Ok(store)
    }

    async fn check_pgvector_extension(&self) -> Result<(), StoreError> {
        let result: Option<(String,)> =
            sqlx::query_as("SELECT extname FROM pg_extension WHERE extname = 'vector'")
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx)?;

        if result.is_none() {
            return Err(StoreError::Unavailable(
                "pgvector extension is not installed. Run: CREATE EXTENSION vector;".to_string(),
            ));
        }

        Ok(())
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        let create_collections = r#"
            CREATE TABLE IF NOT EXISTS collections (
                id UUID PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                slug VARCHAR(255) NOT NULL UNIQUE,
                system_prompt TEXT,
                research_prompt TEXT,
                is_active BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#;

        let create_items = format!(
            r#"
            CREATE TABLE IF NOT EXISTS content_items (
                id UUID PRIMARY KEY,
                seq BIGSERIAL,
                collection_id UUID NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
                content TEXT NOT NULL,
                content_type TEXT NOT NULL DEFAULT 'tweet',
                embedding vector({}) NOT NULL,
                metadata JSONB,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
            self.dimension
        );

        let indices = [
            "CREATE INDEX IF NOT EXISTS content_items_collection_id_idx \
             ON content_items (collection_id)"
                .to_string(),
            "CREATE INDEX IF NOT EXISTS content_items_embedding_idx \
             ON content_items USING ivfflat (embedding vector_cosine_ops) WITH (lists = 100)"
                .to_string(),
        ];

        sqlx::query(create_collections)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        sqlx::query(&create_items)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        for index_sql in &indices {
            sqlx::query(index_sql)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx)?;
        }

        Ok(())
    }

    fn row_to_collection(row: &PgRow) -> Collection {
        Collection {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
            system_prompt: row.get("system_prompt"),
            research_prompt: row.get("research_prompt"),
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn row_to_item(row: &PgRow) -> Result<ContentItem, StoreError> {
        let content_type: String = row.get("content_type");
        let embedding: Vector = row.get("embedding");
        let metadata: Option<serde_json::Value> = row.get("metadata");
        let metadata = match metadata {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| StoreError::Query(format!("malformed item metadata: {e}")))?,
            None => ItemMetadata::default(),
        };

        Ok(ContentItem {
            id: row.get("id"),
            collection_id: row.get("collection_id"),
            content: row.get("content"),
            content_type: content_type.parse()?,
            embedding: embedding.to_vec(),
            metadata,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

fn map_sqlx(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => StoreError::Unavailable(e.to_string()),
        _ => StoreError::Query(e.to_string()),
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| true)
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn create_collection(&self, new: NewCollection) -> Result<Collection, StoreError> {
        if !is_valid_slug(&new.slug) {
            return Err(StoreError::InvalidSlug(new.slug));
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

        // The unique constraint makes the duplicate check atomic under
        // concurrent creators of the same slug.
        sqlx::query(
            r#"
            INSERT INTO collections
                (id, name, slug, system_prompt, research_prompt, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(collection.id)
        .bind(&collection.name)
        .bind(&collection.slug)
        .bind(&collection.system_prompt)
        .bind(&collection.research_prompt)
        .bind(collection.is_active)
        .bind(collection.created_at)
        .bind(collection.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error()
                && db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
            {
                return StoreError::DuplicateSlug(collection.slug.clone());
            }
            map_sqlx(e)
        })?;

        Ok(collection)
    }

    async fn get_collection_by_slug(&self, slug: &str) -> Result<Collection, StoreError> {
        let row = sqlx::query("SELECT * FROM collections WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row.map(|r| Self::row_to_collection(&r))
            .ok_or_else(|| StoreError::CollectionNotFound(slug.to_string()))
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, StoreError> {
        let rows = sqlx::query("SELECT * FROM collections ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(rows.iter().map(Self::row_to_collection).collect())
    }

    async fn set_active(&self, collection_id: Uuid, active: bool) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE collections SET is_active = $2, updated_at = $3 WHERE id = $1")
                .bind(collection_id)
                .bind(active)
                .bind(Utc::now())
                .execute(&self.pool)
                .await
                .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::CollectionNotFound(collection_id.to_string()));
        }
        Ok(())
    }

    async fn add_item(&self, new: NewContentItem) -> Result<ContentItem, StoreError> {
        check_dimension(self.dimension, &new.embedding)?;

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

        let metadata = if item.metadata.is_empty() {
            None
        } else {
            Some(
                serde_json::to_value(&item.metadata)
                    .map_err(|e| StoreError::Query(e.to_string()))?,
            )
        };

        sqlx::query(
            r#"
            INSERT INTO content_items
                (id, collection_id, content, content_type, embedding, metadata,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(item.id)
        .bind(item.collection_id)
        .bind(&item.content)
        .bind(item.content_type.to_string())
        .bind(Vector::from(item.embedding.clone()))
        .bind(metadata)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error()
                && db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
            {
                return StoreError::CollectionNotFound(item.collection_id.to_string());
            }
            map_sqlx(e)
        })?;

        Ok(item)
    }

    async fn list_items(&self, collection_id: Uuid) -> Result<Vec<ContentItem>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM content_items WHERE collection_id = $1 ORDER BY seq DESC",
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.iter().map(Self::row_to_item).collect()
    }

    async fn count_items(&self, collection_id: Uuid) -> Result<u64, StoreError> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM content_items WHERE collection_id = $1")
                .bind(collection_id)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx)?;

        Ok(row.0 as u64)
    }

    async fn delete_collection(&self, collection_id: Uuid) -> Result<(), StoreError> {
        // Items go with the collection via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(collection_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::CollectionNotFound(collection_id.to_string()));
        }
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

        let embedding = Vector::from(query_vector.to_vec());

        let score_filter = if min_score.is_some() {
            "AND 1 - (embedding <=> $2) >= $4"
        } else {
            ""
        };

        // The insertion sequence breaks distance ties, matching the
        // in-process ranking's first-seen-first order.
        let query = format!(
            r#"
            SELECT
                id,
                content,
                content_type,
                1 - (embedding <=> $2) AS score
            FROM content_items
            WHERE collection_id = $1 {}
            ORDER BY embedding <=> $2, seq
            LIMIT $3
            "#,
            score_filter
        );

        let mut query_builder = sqlx::query(&query)
            .bind(collection_id)
            .bind(embedding)
            .bind(limit as i64);

        if let Some(score) = min_score {
            query_builder = query_builder.bind(f64::from(score));
        }

        let rows = query_builder
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        rows.into_iter()
            .map(|row: PgRow| {
                let content_type: String = row.get("content_type");
                let score: f64 = row.get("score");
                Ok(SearchHit {
                    item_id: row.get("id"),
                    score: score as f32,
                    content: row.get("content"),
                    content_type: content_type.parse::<ContentType>()?,
                })
            })
            .collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentType, NewCollection, NewContentItem};
    use crate::services::store::MemoryStore;

    async fn connect_test_store(dimension: usize) -> Option<PgStore> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let config = StoreConfig {
            url,
            ..Default::default()
        };
        PgStore::connect(&config, dimension).await.ok()
    }

    /// Both backends answer the same ranking contract; this holds them to
    /// identical orderings on a fixture that includes a distance tie.
    #[tokio::test]
    #[ignore = "needs a fresh Postgres with pgvector; set DATABASE_URL"]
    async fn test_ranking_matches_in_process_engine() {
        let Some(pg) = connect_test_store(3).await else {
            return;
        };
        let memory = MemoryStore::new(3);

        let slug = format!("rank-parity-{}", Uuid::new_v4().simple());
        let pg_collection = pg
            .create_collection(NewCollection::new("Parity", slug.clone()))
            .await
            .unwrap();
        let mem_collection = memory
            .create_collection(NewCollection::new("Parity", slug))
            .await
            .unwrap();

        // tie-a and tie-b point the same direction, so they score equally
        // and only the insertion tie-break separates them.
        let fixtures = [
            ("best", vec![1.0, 0.0, 0.0]),
            ("tie-a", vec![1.0, 1.0, 0.0]),
            ("tie-b", vec![2.0, 2.0, 0.0]),
            ("worst", vec![-1.0, 0.0, 0.0]),
        ];
        for (content, vector) in &fixtures {
            pg.add_item(NewContentItem::new(
                pg_collection.id,
                *content,
                ContentType::Tweet,
                vector.clone(),
            ))
            .await
            .unwrap();
            memory
                .add_item(NewContentItem::new(
                    mem_collection.id,
                    *content,
                    ContentType::Tweet,
                    vector.clone(),
                ))
                .await
                .unwrap();
        }

        let query = [1.0, 0.0, 0.0];
        let from_pg = pg.search(pg_collection.id, &query, 10, None).await.unwrap();
        let from_memory = memory
            .search(mem_collection.id, &query, 10, None)
            .await
            .unwrap();

        let pg_order: Vec<_> = from_pg.iter().map(|h| h.content.as_str()).collect();
        let memory_order: Vec<_> = from_memory.iter().map(|h| h.content.as_str()).collect();
        assert_eq!(pg_order, memory_order);
        assert_eq!(pg_order, vec!["best", "tie-a", "tie-b", "worst"]);
        for (pg_hit, memory_hit) in from_pg.iter().zip(&from_memory) {
            assert!((pg_hit.score - memory_hit.score).abs() < 1e-5);
        }

        pg.delete_collection(pg_collection.id).await.unwrap();
    }
}
