// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project state.
//!
//! `AppState` is the whole persisted document: the project list plus the
//! pointer to the project currently open.

use super::Video;
use serde::{Deserialize, Serialize};

/// Name given to the project created when none exist.
pub const DEFAULT_PROJECT_NAME: &str = "My Project";

/// A named collection of videos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub created_at: i64,
}

impl Project {
    /// Create an empty project.
    pub fn new(id: String, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            videos: Vec::new(),
            created_at: super::now_millis(),
        }
    }

    pub fn video(&self, video_id: &str) -> Option<&Video> {
        self.videos.iter().find(|v| v.id == video_id)
    }

    /// Look a video up by its external identifier.
    pub fn video_by_external_id(&self, external_id: &str) -> Option<&Video> {
        self.videos.iter().find(|v| v.video_id == external_id)
    }
}

/// The complete application document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub current_project_id: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let project = Project::new(super::new_id(), DEFAULT_PROJECT_NAME);
        Self {
            current_project_id: Some(project.id.clone()),
            projects: vec![project],
        }
    }
}

impl AppState {
    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    /// The current project, falling back to the first one when the pointer
    /// is empty or dangling.
    pub fn current_project(&self) -> Option<&Project> {
        self.current_project_id
            .as_deref()
            .and_then(|id| self.project(id))
            .or_else(|| self.projects.first())
    }

    pub fn video(&self, project_id: &str, video_id: &str) -> Option<&Video> {
        self.project(project_id).and_then(|p| p.video(video_id))
    }
}
