//! Ingestion pipeline: chunk, embed, and store raw text.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{ChunkError, IngestError};
use crate::models::{Collection, ContentType, ItemMetadata, NewCollection, NewContentItem};
use crate::services::chunker::TextChunker;
use crate::services::embedding::Embedder;
use crate::services::store::ContentStore;

/// Outcome of one ingest call.
///
/// Failures are keyed by the chunk's position in the chunker output, not by
/// completion order, so reports are deterministic.
#[derive(Debug)]
pub struct IngestReport {
    pub succeeded: usize,
    pub failed: Vec<ChunkFailure>,
}

#[derive(Debug)]
pub struct ChunkFailure {
    pub index: usize,
    pub error: ChunkError,
}

impl IngestReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Ties chunking, embedding, and storage together with per-chunk failure
/// isolation: one bad chunk never discards its siblings.
///
/// Dependencies are injected; there is no process-wide client state.
pub struct IngestPipeline {
    chunker: TextChunker,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn ContentStore>,
}

impl IngestPipeline {
    pub fn new(
        chunker: TextChunker,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn ContentStore>,
    ) -> Self {
        Self {
            chunker,
            embedder,
            store,
        }
    }

    /// Ingest raw text into the collection addressed by `slug`.
    ///
    /// Fails the whole call only when the collection cannot be resolved.
    /// Each chunk is embedded and stored independently; a chunk's failure is
    /// recorded in the report and the rest continue.
    pub async fn ingest(
        &self,
        slug: &str,
        raw_text: &str,
        content_type: ContentType,
        metadata: ItemMetadata,
    ) -> Result<IngestReport, IngestError> {
        self.ingest_with_cancel(slug, raw_text, content_type, metadata, None)
            .await
    }

    /// Like [`ingest`](Self::ingest), with a cooperative cancellation signal
    /// checked at chunk boundaries. Already-stored chunks stay stored;
    /// unprocessed chunks are reported failed as cancelled.
    pub async fn ingest_with_cancel(
        &self,
        slug: &str,
        raw_text: &str,
        content_type: ContentType,
        metadata: ItemMetadata,
        cancel: Option<&watch::Receiver<bool>>,
    ) -> Result<IngestReport, IngestError> {
        let collection = self.store.get_collection_by_slug(slug).await?;
        let chunks = self.chunker.chunk(raw_text, content_type);

        let mut report = IngestReport {
            succeeded: 0,
            failed: Vec::new(),
        };

        for (index, chunk) in chunks.iter().enumerate() {
            if cancel.is_some_and(|rx| *rx.borrow()) {
                report.failed.push(ChunkFailure {
                    index,
                    error: ChunkError::Cancelled,
                });
                continue;
            }

            match self
                .process_chunk(collection.id, chunk, content_type, &metadata)
                .await
            {
                Ok(()) => report.succeeded += 1,
                Err(error) => report.failed.push(ChunkFailure { index, error }),
            }
        }

        Ok(report)
    }

    /// Create a collection and ingest into it in one call, mirroring the
    /// upload flow: the collection exists even if some chunks fail.
    pub async fn create_and_ingest(
        &self,
        new: NewCollection,
        raw_text: &str,
        content_type: ContentType,
        metadata: ItemMetadata,
    ) -> Result<(Collection, IngestReport), IngestError> {
        let collection = self.store.create_collection(new).await?;
        let report = self
            .ingest(&collection.slug, raw_text, content_type, metadata)
            .await?;
        Ok((collection, report))
    }

    async fn process_chunk(
        &self,
        collection_id: uuid::Uuid,
        chunk: &str,
        content_type: ContentType,
        metadata: &ItemMetadata,
    ) -> Result<(), ChunkError> {
        let embedding = self.embedder.embed(chunk).await?;
        self.store
            .add_item(
                NewContentItem::new(collection_id, chunk, content_type, embedding)
                    .with_metadata(metadata.clone()),
            )
            .await?;
        Ok(())
    }
}
