// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Bookmark data structures.
//!
//! A bookmark is a titled, optionally tagged and color-coded marker at a
//! playback position.

use serde::{Deserialize, Serialize};

/// Title used when the user leaves it blank.
pub const DEFAULT_TITLE: &str = "Bookmark";

/// Color category used when none is given.
pub const DEFAULT_COLOR: &str = "blue";

/// Color categories offered by the UI. Stored as plain strings so records
/// written with other categories still load.
pub const COLORS: [&str; 5] = ["blue", "green", "yellow", "red", "purple"];

/// A timestamped, taggable marker in a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    #[serde(deserialize_with = "super::lenient_seconds", default)]
    pub t: u32,
    pub title: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub created_at: i64,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Bookmark {
    /// Create a bookmark, filling in the default title and color for blank
    /// or missing values.
    pub fn new(
        id: String,
        t: u32,
        title: Option<&str>,
        tag: Option<&str>,
        color: Option<&str>,
    ) -> Self {
        let non_blank = |s: Option<&str>| {
            s.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            id,
            t,
            title: non_blank(title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            tag: non_blank(tag),
            color: non_blank(color).unwrap_or_else(default_color),
            created_at: super::now_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_blank_fields() {
        let bookmark = Bookmark::new("b1".into(), 90, Some("   "), Some(""), None);
        assert_eq!(bookmark.title, "Bookmark");
        assert_eq!(bookmark.tag, None);
        assert_eq!(bookmark.color, "blue");
    }

    #[test]
    fn test_explicit_fields_kept() {
        let bookmark = Bookmark::new("b1".into(), 5, Some("Proof"), Some("exam"), Some("red"));
        assert_eq!(bookmark.title, "Proof");
        assert_eq!(bookmark.tag.as_deref(), Some("exam"));
        assert_eq!(bookmark.color, "red");
    }

    #[test]
    fn test_missing_color_deserializes_to_default() {
        let bookmark: Bookmark =
            serde_json::from_str(r#"{"id":"b","t":1,"title":"x"}"#).unwrap();
        assert_eq!(bookmark.color, DEFAULT_COLOR);
        assert_eq!(bookmark.tag, None);
    }
}
