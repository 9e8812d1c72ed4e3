// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timestamped markdown notes.

use serde::{Deserialize, Serialize};

/// A markdown annotation tied to a moment in a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    /// Seconds into the video.
    #[serde(deserialize_with = "super::lenient_seconds", default)]
    pub t: u32,
    pub text: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Note {
    /// Create a note at `t` seconds. The text is stored trimmed.
    pub fn new(id: String, t: u32, text: &str) -> Self {
        let now = super::now_millis();
        Self {
            id,
            t,
            text: text.trim().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// First line of the note, for list display.
    pub fn headline(&self) -> &str {
        self.text.lines().next().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_note_trims_text() {
        let note = Note::new("n1".into(), 42, "  recursion\nbase case  ");
        assert_eq!(note.text, "recursion\nbase case");
        assert_eq!(note.headline(), "recursion");
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn test_missing_updated_at_defaults() {
        let note: Note = serde_json::from_str(r#"{"id":"a","t":3.7,"text":"x"}"#).unwrap();
        assert_eq!(note.t, 3);
        assert_eq!(note.updated_at, 0);
    }
}
