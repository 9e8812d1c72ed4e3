// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Typed errors surfaced to the user.
//!
//! None of these are fatal. A `StoreError` means the attempted change was
//! not applied and the previous document is still current.

use thiserror::Error;

/// Rejection of a document change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(String),

    #[error("Not a YouTube video or playlist link: {0}")]
    UnresolvableReference(String),

    #[error("Video is already in this project")]
    DuplicateVideo { id: String },

    #[error("Note text cannot be empty")]
    EmptyNote,

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Nothing to add: every playlist video is already in this project")]
    NothingToAdd,
}

/// Failure to expand a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("No YouTube API key configured; set YOUTUBE_API_KEY or add videos one by one")]
    MissingApiKey,

    #[error("Could not reach YouTube ({0}); check your connection or add videos one by one")]
    Network(String),

    #[error("YouTube rejected the request (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("The playlist has no playable videos")]
    Empty,
}

/// Reasons a local reminder could not be scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("Reminders are not supported here")]
    Unsupported,

    #[error("Reminder permission was denied")]
    PermissionDenied,
}
