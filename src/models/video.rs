// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video records.
//!
//! A video is a reference to an external YouTube video (or playlist) plus
//! the notes, bookmarks and resume position stored for it locally.

use super::{Bookmark, Note};
use crate::reference::VideoRef;
use serde::{Deserialize, Serialize};

/// What the external identifier points at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoKind {
    #[default]
    Video,
    Playlist,
}

/// A video and its local annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    /// External platform identifier.
    pub video_id: String,
    #[serde(default)]
    pub kind: VideoKind,
    #[serde(default)]
    pub title: String,
    /// The reference string as the user pasted it.
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
    #[serde(deserialize_with = "super::lenient_seconds", default)]
    pub last_time: u32,
    #[serde(default)]
    pub playlist_index: Option<u32>,
    #[serde(default)]
    pub created_at: i64,
}

impl Video {
    /// Create an empty record for a resolved reference. The title starts out
    /// as the external id until something better is known.
    pub fn new(id: String, reference: &VideoRef, source: &str) -> Self {
        Self {
            id,
            video_id: reference.id.clone(),
            kind: reference.kind,
            title: reference.id.clone(),
            source: source.trim().to_string(),
            notes: Vec::new(),
            bookmarks: Vec::new(),
            last_time: 0,
            playlist_index: None,
            created_at: super::now_millis(),
        }
    }

    /// Whether `id` is used by any note or bookmark of this video.
    pub fn has_item_id(&self, id: &str) -> bool {
        self.notes.iter().any(|n| n.id == id) || self.bookmarks.iter().any(|b| b.id == id)
    }

    /// Link that opens the video in a browser, starting at `seconds`.
    pub fn watch_url(&self, seconds: u32) -> String {
        match self.kind {
            VideoKind::Video if seconds > 0 => {
                format!("https://youtu.be/{}?t={}", self.video_id, seconds)
            }
            VideoKind::Video => format!("https://youtu.be/{}", self.video_id),
            VideoKind::Playlist => match self.playlist_index {
                Some(index) => format!(
                    "https://www.youtube.com/playlist?list={}&index={}",
                    self.video_id,
                    index + 1
                ),
                None => format!("https://www.youtube.com/playlist?list={}", self.video_id),
            },
        }
    }
}
