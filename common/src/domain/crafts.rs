use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A Craft: one artisan submission, either a draft or published.
/// Persisted as camelCase JSON inside the drafts/published slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Craft {
    /// Unique across drafts and published crafts combined
    pub id: CraftId,

    /// Client-supplied content
    #[serde(flatten)]
    pub fields: CraftFields,

    /// Counters start at zero and are never touched by the client core
    #[serde(flatten)]
    pub engagement: Engagement,

    pub created_at: DateTime<Utc>,

    pub is_draft: bool,
}

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CraftId(pub Uuid);

impl CraftId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for CraftId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl TryFrom<&str> for CraftId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let uuid = Uuid::parse_str(value)?;
        Ok(Self(uuid))
    }
}

impl From<CraftId> for String {
    fn from(value: CraftId) -> Self {
        value.0.to_string()
    }
}

impl fmt::Display for CraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Everything the artisan fills in on the upload form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CraftFields {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub region: String,
    pub category: String,
    pub artisan_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// unordered, duplicates allowed
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
}

impl Craft {
    /// New craft with zeroed counters
    pub fn new(id: CraftId, fields: CraftFields, created_at: DateTime<Utc>, is_draft: bool) -> Self {
        Self {
            id,
            fields,
            engagement: Engagement::default(),
            created_at,
            is_draft,
        }
    }

    /// Same craft with the draft flag cleared, everything else preserved
    pub fn into_published(self) -> Self {
        Self {
            is_draft: false,
            ..self
        }
    }
}
