//! Core data structures for the ocean-notes application.
//!
//! This module contains the Note record persisted by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fallback title applied whenever a title is blank after trimming.
pub const UNTITLED: &str = "Untitled";

/// Represents a single note in our system.
///
/// Serialized in camelCase with ISO-8601 timestamps so the persisted layout
/// is `{id, title, content, createdAt, updatedAt, pinned}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for the note, assigned at creation
    pub id: String,
    /// Note title, never empty after a write
    pub title: String,
    /// Free-form note body
    pub content: String,
    /// When the note was created
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
    /// Whether the note is pinned
    pub pinned: bool,
}

impl Note {
    /// Creates a new note with the given title and content
    pub fn new(title: &str, content: &str) -> Self {
        let now = Utc::now();

        Note {
            id: Uuid::new_v4().to_string(),
            title: normalize_title(title),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
            pinned: false,
        }
    }

    /// Refreshes the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Applies the title-default rule: a blank or whitespace-only title
/// becomes "Untitled".
pub fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}
