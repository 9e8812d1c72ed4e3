// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video reference resolution.
//!
//! Turns whatever the user pasted (a bare video id, a `youtu.be` short link,
//! a watch/embed URL or a playlist URL) into the canonical external
//! identifier. Resolution is pure: unresolvable input yields `None`.

use crate::models::VideoKind;
use url::Url;

/// Length of a YouTube video identifier.
pub const VIDEO_ID_LEN: usize = 11;

/// A resolved external reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    pub id: String,
    pub kind: VideoKind,
}

impl VideoRef {
    fn video(id: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: VideoKind::Video,
        }
    }

    fn playlist(id: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: VideoKind::Playlist,
        }
    }
}

/// Whether `s` is exactly an 11-character `[A-Za-z0-9_-]` token.
pub fn is_video_id(s: &str) -> bool {
    s.len() == VIDEO_ID_LEN
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Resolve a pasted reference. Playlist URLs are only recognised when
/// `playlist_aware` is set; otherwise a watch URL carrying both `list` and
/// `v` resolves to the video.
pub fn resolve(input: &str, playlist_aware: bool) -> Option<VideoRef> {
    let input = input.trim();
    if is_video_id(input) {
        return Some(VideoRef::video(input));
    }

    let url = Url::parse(input).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();

    if host == "youtu.be" || host == "www.youtu.be" {
        return url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|id| !id.is_empty())
            .map(VideoRef::video);
    }

    if !host.contains("youtube.com") {
        return None;
    }

    let query = |name: &str| {
        url.query_pairs()
            .find(|(key, value)| key == name && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    };

    if playlist_aware {
        if let Some(list) = query("list") {
            return Some(VideoRef::playlist(&list));
        }
    }
    if let Some(v) = query("v") {
        return Some(VideoRef::video(&v));
    }

    let mut segments = url.path_segments()?;
    match (segments.next(), segments.next()) {
        (Some("embed"), Some(id)) if is_video_id(id) => Some(VideoRef::video(id)),
        _ => None,
    }
}
