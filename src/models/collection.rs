//! Collections: named, slug-addressed isolation boundaries for content items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named group of content items sharing one embedding space.
///
/// The slug is the external lookup key: globally unique, case-sensitive, and
/// immutable once assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    /// Free-form prompt handed to the answering model; opaque here.
    pub system_prompt: Option<String>,
    /// Prompt for the secondary research provider; opaque here.
    pub research_prompt: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCollection {
    pub name: String,
    pub slug: String,
    pub system_prompt: Option<String>,
    pub research_prompt: Option<String>,
    pub is_active: bool,
}

impl NewCollection {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            system_prompt: None,
            research_prompt: None,
            is_active: true,
        }
    }

    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    #[must_use]
    pub fn with_research_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.research_prompt = Some(prompt.into());
        self
    }
}

/// Check slug format: letters, digits, hyphens, and underscores only.
///
/// The CLI validates before calling the store; the store re-validates
/// defensively.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
