//! Note model
//!
//! Notes are owned by the document store. The ranking code only ever borrows
//! them; nothing in this crate mutates a note after it has been loaded.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single note as seen by the ranking pipelines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Opaque unique identifier
    pub id: String,
    /// Note title
    #[serde(default)]
    pub title: String,
    /// Free-form body text
    #[serde(default)]
    pub content: String,
    /// Tags (unordered, duplicates collapse on load)
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Last update timestamp
    pub updated: DateTime<Utc>,
    /// Whether the note is pinned in the UI
    #[serde(default)]
    pub pinned: bool,
}

impl Note {
    /// Create a note stamped with the current time
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Note {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            tags: BTreeSet::new(),
            created: now,
            updated: now,
            pinned: false,
        }
    }

    /// Replace the tag set
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set both timestamps
    pub fn with_timestamps(mut self, created: DateTime<Utc>, updated: DateTime<Utc>) -> Self {
        self.created = created;
        self.updated = updated;
        self
    }

    /// Set the last update timestamp
    pub fn with_updated(mut self, updated: DateTime<Utc>) -> Self {
        self.updated = updated;
        self
    }

    /// Title and content joined, as sent to keyword matchers
    pub fn full_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }
}
