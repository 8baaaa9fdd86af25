//! Core services: chunking, embedding, similarity, storage, ingestion.

pub mod chunker;
pub mod embedding;
pub mod ingest;
pub mod query;
pub mod similarity;
pub mod store;

pub use chunker::TextChunker;
pub use embedding::{Embedder, EmbeddingClient};
pub use ingest::{ChunkFailure, IngestPipeline, IngestReport};
pub use query::QueryEngine;
pub use store::{ContentStore, MemoryStore, PgStore};
