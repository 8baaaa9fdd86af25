//! Error types for ragstore.

use thiserror::Error;

use crate::utils::retry::Retryable;

/// Errors related to the content store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("collection slug already in use: {0}")]
    DuplicateSlug(String),

    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("invalid slug {0:?}: only letters, digits, hyphens, and underscores are allowed")]
    InvalidSlug(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("unknown content type: {0}")]
    UnknownContentType(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store query failed: {0}")]
    Query(String),
}

impl Retryable for StoreError {
    fn is_retryable(&self) -> bool {
        match self {
            StoreError::Unavailable(_) => true,
            StoreError::Query(msg) => {
                let msg_lower = msg.to_lowercase();
                msg_lower.contains("timeout")
                    || msg_lower.contains("connection")
                    || msg_lower.contains("unavailable")
            }
            _ => false,
        }
    }
}

/// Errors related to the embedding provider.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to connect to embedding API: {0}")]
    ConnectionError(String),

    #[error("embedding API error: {0}")]
    ServerError(String),

    #[error("embedding request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("embedding request timed out")]
    Timeout,
}

impl Retryable for EmbeddingError {
    fn is_retryable(&self) -> bool {
        match self {
            EmbeddingError::ConnectionError(_) | EmbeddingError::Timeout => true,
            // Rate limits and transient upstream failures
            EmbeddingError::ServerError(msg) => {
                msg.contains("429") || msg.contains("502") || msg.contains("503")
            }
            EmbeddingError::RequestError(e) => e.is_timeout() || e.is_connect(),
            EmbeddingError::InvalidResponse(_) => false,
        }
    }
}

/// Errors from in-process similarity computation.
#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl From<SimilarityError> for StoreError {
    fn from(e: SimilarityError) -> Self {
        match e {
            SimilarityError::DimensionMismatch { expected, actual } => {
                StoreError::DimensionMismatch { expected, actual }
            }
        }
    }
}

/// Failure attributable to a single chunk during ingestion.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("store write failed: {0}")]
    Store(#[from] StoreError),

    #[error("cancelled before processing")]
    Cancelled,
}

/// Whole-call errors from the ingestion pipeline.
///
/// Per-chunk failures are reported through the ingest report, not through
/// this type.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors related to query operations.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl Retryable for SearchError {
    fn is_retryable(&self) -> bool {
        match self {
            SearchError::Embedding(e) => e.is_retryable(),
            SearchError::Store(e) => e.is_retryable(),
            SearchError::InvalidQuery(_) => false,
        }
    }
}

/// Errors related to configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("path error: {0}")]
    PathError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_retryable() {
        assert!(StoreError::Unavailable("connection refused".into()).is_retryable());
        assert!(StoreError::Query("connection reset by peer".into()).is_retryable());
        assert!(!StoreError::DuplicateSlug("demo".into()).is_retryable());
        assert!(
            !StoreError::DimensionMismatch {
                expected: 1536,
                actual: 3
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_embedding_error_retryable() {
        assert!(EmbeddingError::Timeout.is_retryable());
        assert!(EmbeddingError::ServerError("status 429".into()).is_retryable());
        assert!(!EmbeddingError::ServerError("status 401".into()).is_retryable());
        assert!(!EmbeddingError::InvalidResponse("truncated".into()).is_retryable());
    }

    #[test]
    fn test_similarity_error_maps_to_store_error() {
        let e = SimilarityError::DimensionMismatch {
            expected: 4,
            actual: 3,
        };
        match StoreError::from(e) {
            StoreError::DimensionMismatch { expected, actual } => {
                assert_eq!(expected, 4);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected: {other}"),
        }
    }
}
