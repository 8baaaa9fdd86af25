//! Embedding client for an OpenAI-compatible embeddings API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::EmbeddingError;
use crate::models::EmbeddingConfig;

/// Converts text into fixed-dimension vectors.
///
/// Implementations must preserve input order in batch calls and fail the
/// whole call on provider errors; retry policy belongs to the caller.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed many texts, one vector per input, order preserved.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Output dimensionality for this provider/model configuration.
    fn dimension(&self) -> usize;
}

/// Request body for the `/v1/embeddings` endpoint.
#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
    encoding_format: &'static str,
    dimensions: usize,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Debug, Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
    index: usize,
}

/// Client for the external embedding provider.
///
/// The sole adapter boundary to the provider: nothing else in the crate
/// knows the wire format.
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    dimension: usize,
    batch_size: usize,
}

impl EmbeddingClient {
    /// Create a client from configuration. The API key comes from the config
    /// (populated from `OPENAI_API_KEY`).
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| EmbeddingError::ConnectionError("OPENAI_API_KEY not set".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            dimension: config.dimension,
            // chunks() requires a non-zero size
            batch_size: (config.batch_size as usize).max(1),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// One HTTP round-trip for up to `batch_size` inputs. Atomic: any
    /// provider error fails the whole call with no partial result.
    async fn request_embeddings(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let url = format!("{}/v1/embeddings", self.api_url);
        let request = EmbedRequest {
            model: &self.model,
            input: inputs,
            encoding_format: "float",
            dimensions: self.dimension,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmbeddingError::Timeout
                } else {
                    EmbeddingError::RequestError(e)
                }
            })?;

        if !response.status().is_success() {
            // Status only; the provider body is not propagated verbatim.
            return Err(EmbeddingError::ServerError(format!(
                "status {}",
                response.status().as_u16()
            )));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        if embed_response.data.len() != inputs.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                embed_response.data.len()
            )));
        }

        let mut data = embed_response.data;
        data.sort_by_key(|d| d.index);

        for entry in &data {
            if entry.embedding.len() != self.dimension {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "expected {}-dimensional vectors, got {}",
                    self.dimension,
                    entry.embedding.len()
                )));
            }
        }

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let vectors = self.request_embeddings(&[text.to_string()]).await?;
        vectors
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let embeddings = self.request_embeddings(batch).await?;
            all_embeddings.extend(embeddings);
        }

        Ok(all_embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> EmbeddingConfig {
        EmbeddingConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_client_creation() {
        let client = EmbeddingClient::new(&config_with_key());
        assert!(client.is_ok());
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let config = EmbeddingConfig::default();
        assert!(EmbeddingClient::new(&config).is_err());
    }

    #[test]
    fn test_api_url_trimming() {
        let config = EmbeddingConfig {
            api_url: "https://api.openai.com/".to_string(),
            ..config_with_key()
        };
        let client = EmbeddingClient::new(&config).unwrap();
        assert_eq!(client.api_url(), "https://api.openai.com");
    }

    #[test]
    fn test_zero_batch_size_clamped() {
        let config = EmbeddingConfig {
            batch_size: 0,
            ..config_with_key()
        };
        let client = EmbeddingClient::new(&config).unwrap();
        assert_eq!(client.batch_size, 1);
    }

    #[test]
    fn test_dimension_from_config() {
        let config = EmbeddingConfig {
            dimension: 256,
            ..config_with_key()
        };
        let client = EmbeddingClient::new(&config).unwrap();
        assert_eq!(client.dimension(), 256);
    }
}
