use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_COLOR: &str = "#ffffff";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub is_favorite: bool,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Note {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Live and owned by `user_id`.
    pub fn is_visible_to(&self, user_id: &str) -> bool {
        self.owner_id == user_id && !self.is_deleted()
    }
}

/// The user-editable fields of a note.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, category: &str) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: Some(category.to_string()),
        }
    }

    /// Category with blank values replaced by `"general"`.
    pub fn category(&self) -> String {
        match self.category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => DEFAULT_CATEGORY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
}
