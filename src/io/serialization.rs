// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project export and import.
//!
//! A project is written as a standalone JSON or YAML document, picked by
//! file extension. Imported projects go through `store::ops::import_project`,
//! which regenerates colliding identifiers.

use crate::models::Project;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Supported project file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            other => bail!("Unsupported file extension: {:?}", other),
        }
    }
}

/// Serialize a project to a string.
pub fn to_string(project: &Project, format: Format) -> Result<String> {
    let text = match format {
        Format::Json => serde_json::to_string_pretty(project)?,
        Format::Yaml => serde_yaml::to_string(project)?,
    };
    Ok(text)
}

/// Parse a project from a string.
pub fn from_str(text: &str, format: Format) -> Result<Project> {
    let project = match format {
        Format::Json => serde_json::from_str(text)?,
        Format::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(project)
}

/// Export a project to `path`, format chosen by extension.
pub fn export_project(project: &Project, path: &Path) -> Result<()> {
    let text = to_string(project, Format::from_path(path)?)?;
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Import a project from `path`, format chosen by extension.
pub fn import_project(path: &Path) -> Result<Project> {
    let format = Format::from_path(path)?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    from_str(&text, format).with_context(|| format!("Not a project file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppState;
    use crate::store::{ops, InsertOrder};
    use tempfile::tempdir;

    fn sample_state() -> (AppState, String) {
        let state = AppState::default();
        let project_id = state.projects[0].id.clone();
        let (state, video_id) =
            ops::add_video(&state, &project_id, "dQw4w9WgXcQ", InsertOrder::Front, true).unwrap();
        let (state, _) =
            ops::add_note(&state, &project_id, &video_id, 61, "**key** idea", InsertOrder::Front)
                .unwrap();
        let (state, _) = ops::add_bookmark(
            &state,
            &project_id,
            &video_id,
            ops::NewBookmark {
                t: 5,
                title: Some("Intro"),
                tag: Some("exam"),
                color: Some("red"),
            },
            InsertOrder::Front,
        )
        .unwrap();
        (state, project_id)
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.YML")).unwrap(), Format::Yaml);
        assert!(Format::from_path(Path::new("a.txt")).is_err());
        assert!(Format::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_export_then_reimport_under_fresh_id() {
        let dir = tempdir().expect("Failed to create temp dir");
        let (state, project_id) = sample_state();
        let original = state.project(&project_id).unwrap();

        for name in ["export.json", "export.yaml"] {
            let path = dir.path().join(name);
            export_project(original, &path).unwrap();

            let loaded = import_project(&path).unwrap();
            let (next, new_id) = ops::import_project(&state, loaded);
            let imported = next.project(&new_id).unwrap();

            assert_ne!(new_id, project_id);
            assert_eq!(imported.name, original.name);
            assert_eq!(imported.created_at, original.created_at);
            assert_eq!(imported.videos, original.videos);
        }
    }

    #[test]
    fn test_import_rejects_non_project() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(import_project(&path).is_err());
    }
}
