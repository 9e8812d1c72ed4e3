// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Document model: projects, videos, notes and bookmarks.
//!
//! Everything here is plain data. Mutation rules live in `crate::store`.

pub mod bookmark;
pub mod note;
pub mod project;
pub mod video;

pub use bookmark::Bookmark;
pub use note::Note;
pub use project::{AppState, Project};
pub use video::{Video, VideoKind};

use serde::{Deserialize, Deserializer};

/// Current time as Unix epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Fresh random identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Generate an identifier not rejected by `taken`.
pub fn unique_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = new_id();
        if !taken(&id) {
            return id;
        }
    }
}

/// Lenient seconds field: older records may carry fractional or negative
/// numbers, which are floored and clamped to zero instead of failing the
/// whole document.
pub(crate) fn lenient_seconds<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map(clamp_seconds).unwrap_or(0))
}

/// Floor a playback position to whole non-negative seconds.
pub fn clamp_seconds(seconds: f64) -> u32 {
    if !seconds.is_finite() || seconds <= 0.0 {
        0
    } else if seconds >= u32::MAX as f64 {
        u32::MAX
    } else {
        seconds.floor() as u32
    }
}
