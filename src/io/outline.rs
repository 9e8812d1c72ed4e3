// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Plain-text outline of a video's notes and bookmarks.

use crate::models::Video;
use crate::util::timecode::format_whole_seconds;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Order of entries in the outline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlineOrder {
    /// As stored, most recent first.
    #[default]
    Stored,
    Chronological,
}

fn ordered<T>(items: &[T], order: OutlineOrder, t: impl Fn(&T) -> u32) -> Vec<&T> {
    let mut refs: Vec<&T> = items.iter().collect();
    if order == OutlineOrder::Chronological {
        refs.sort_by_key(|item| t(*item));
    }
    refs
}

fn write_outline(out: &mut impl fmt::Write, video: &Video, order: OutlineOrder) -> fmt::Result {
    writeln!(out, "{}", video.title)?;
    writeln!(out, "{}", video.watch_url(0))?;

    writeln!(out, "\nNotes")?;
    if video.notes.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for note in ordered(&video.notes, order, |n| n.t) {
        writeln!(out, "- [{}] {}", format_whole_seconds(note.t), note.headline())?;
        for line in note.text.lines().skip(1) {
            writeln!(out, "    {}", line)?;
        }
    }

    writeln!(out, "\nBookmarks")?;
    if video.bookmarks.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for bookmark in ordered(&video.bookmarks, order, |b| b.t) {
        write!(out, "- [{}] {}", format_whole_seconds(bookmark.t), bookmark.title)?;
        if let Some(tag) = &bookmark.tag {
            write!(out, " #{}", tag)?;
        }
        writeln!(out, " ({})", bookmark.color)?;
    }
    Ok(())
}

/// Render the outline.
pub fn render(video: &Video, order: OutlineOrder) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_outline(&mut out, video, order);
    out
}

/// Write the outline of `video` to `path`.
pub fn export_outline(video: &Video, order: OutlineOrder, path: &Path) -> Result<()> {
    std::fs::write(path, render(video, order))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bookmark, Note, VideoKind};
    use crate::reference::VideoRef;

    fn sample() -> Video {
        let reference = VideoRef {
            id: "dQw4w9WgXcQ".into(),
            kind: VideoKind::Video,
        };
        let mut video = Video::new("v".into(), &reference, "dQw4w9WgXcQ");
        video.title = "Lecture 4".into();
        video.notes = vec![
            Note::new("n2".into(), 3661, "later\nsecond line"),
            Note::new("n1".into(), 59, "early"),
        ];
        video.bookmarks = vec![
            Bookmark::new("b2".into(), 120, Some("Proof"), Some("exam"), Some("red")),
            Bookmark::new("b1".into(), 0, None, None, None),
        ];
        video
    }

    #[test]
    fn test_stored_order() {
        let text = render(&sample(), OutlineOrder::Stored);
        let expected = "Lecture 4\n\
                        https://youtu.be/dQw4w9WgXcQ\n\
                        \n\
                        Notes\n\
                        - [1:01:01] later\n    second line\n\
                        - [0:59] early\n\
                        \n\
                        Bookmarks\n\
                        - [2:00] Proof #exam (red)\n\
                        - [0:00] Bookmark (blue)\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_chronological_order() {
        let text = render(&sample(), OutlineOrder::Chronological);
        let early = text.find("[0:59] early").unwrap();
        let later = text.find("[1:01:01] later").unwrap();
        assert!(early < later);
        assert!(text.find("[0:00] Bookmark").unwrap() < text.find("[2:00] Proof").unwrap());
    }

    #[test]
    fn test_empty_sections() {
        let mut video = sample();
        video.notes.clear();
        video.bookmarks.clear();
        let text = render(&video, OutlineOrder::Stored);
        assert_eq!(text.matches("(none)").count(), 2);
    }

    struct Full;

    impl fmt::Write for Full {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn test_write_error_stops_outline() {
        assert!(write_outline(&mut Full, &sample(), OutlineOrder::Stored).is_err());
    }
}
