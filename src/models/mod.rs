//! Core data models.

pub mod collection;
pub mod config;
pub mod content;
pub mod search;

pub use collection::{Collection, NewCollection, is_valid_slug};
pub use config::{ChunkingConfig, Config, EmbeddingConfig, SearchConfig, StoreConfig};
pub use content::{ContentItem, ContentType, Engagement, ItemMetadata, NewContentItem};
pub use search::{OutputFormat, QueryResults, SearchHit};
