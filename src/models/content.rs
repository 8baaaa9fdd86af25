//! Content items: one normalized chunk of text plus its embedding vector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::StoreError;

/// Kind of source a chunk came from. Closed set; unrecognized values are
/// rejected at the store boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Tweet,
    Thread,
    Article,
    Custom,
}

impl ContentType {
    /// Social-media posts get URL and mention stripping before embedding.
    pub fn is_social(self) -> bool {
        matches!(self, ContentType::Tweet | ContentType::Thread)
    }
}

impl std::str::FromStr for ContentType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tweet" => Ok(ContentType::Tweet),
            "thread" => Ok(ContentType::Thread),
            "article" => Ok(ContentType::Article),
            "custom" => Ok(ContentType::Custom),
            _ => Err(StoreError::UnknownContentType(s.to_string())),
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Tweet => write!(f, "tweet"),
            ContentType::Thread => write!(f, "thread"),
            ContentType::Article => write!(f, "article"),
            ContentType::Custom => write!(f, "custom"),
        }
    }
}

/// Engagement counters for social-media sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub retweets: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<u64>,
}

/// Metadata attached to a content item.
///
/// Known fields are typed; `context` is the escape hatch for arbitrary nested
/// data, and unknown top-level keys round-trip unchanged through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<Engagement>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemMetadata {
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
            && self.author.is_none()
            && self.timestamp.is_none()
            && self.engagement.is_none()
            && self.context.is_none()
            && self.extra.is_empty()
    }
}

/// A stored chunk with its embedding, owned by exactly one collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub content: String,
    pub content_type: ContentType,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
    pub metadata: ItemMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to store a content item.
#[derive(Debug, Clone)]
pub struct NewContentItem {
    pub collection_id: Uuid,
    pub content: String,
    pub content_type: ContentType,
    pub embedding: Vec<f32>,
    pub metadata: ItemMetadata,
}

impl NewContentItem {
    pub fn new(
        collection_id: Uuid,
        content: impl Into<String>,
        content_type: ContentType,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            collection_id,
            content: content.into(),
            content_type,
            embedding,
            metadata: ItemMetadata::default(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: ItemMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_parse() {
        assert_eq!("tweet".parse::<ContentType>().unwrap(), ContentType::Tweet);
        assert_eq!(
            "article".parse::<ContentType>().unwrap(),
            ContentType::Article
        );
        assert!("TWEET".parse::<ContentType>().is_err());
        assert!("video".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_content_type_social() {
        assert!(ContentType::Tweet.is_social());
        assert!(ContentType::Thread.is_social());
        assert!(!ContentType::Article.is_social());
        assert!(!ContentType::Custom.is_social());
    }

    #[test]
    fn test_metadata_unknown_keys_round_trip() {
        let json = serde_json::json!({
            "source": "export.txt",
            "author": "alice",
            "engagement": { "likes": 10 },
            "campaign": "launch-week",
            "ranking": { "weight": 0.5 }
        });

        let metadata: ItemMetadata = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(metadata.author.as_deref(), Some("alice"));
        assert_eq!(metadata.engagement.as_ref().unwrap().likes, Some(10));
        assert_eq!(metadata.extra["campaign"], "launch-week");

        let back = serde_json::to_value(&metadata).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn test_metadata_is_empty() {
        assert!(ItemMetadata::default().is_empty());
        let m = ItemMetadata {
            source: Some("s".into()),
            ..Default::default()
        };
        assert!(!m.is_empty());
    }
}
