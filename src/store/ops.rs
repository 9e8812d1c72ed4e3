// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pure document transformations.
//!
//! Every operation reads the current `AppState` and returns a new one; the
//! input is never touched. An `Err` means nothing changed and the caller
//! should keep (and keep showing) its previous state.

use super::InsertOrder;
use crate::error::StoreError;
use crate::models::{
    new_id, now_millis, project::DEFAULT_PROJECT_NAME, unique_id, AppState, Bookmark, Note,
    Project, Video, VideoKind,
};
use crate::playlist::PlaylistEntry;
use crate::reference::{self, VideoRef};
use std::collections::HashSet;

/// Name used when a project is created with a blank name.
pub const UNTITLED_PROJECT: &str = "Untitled project";

/// Fields of a bookmark about to be added.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewBookmark<'a> {
    pub t: u32,
    pub title: Option<&'a str>,
    pub tag: Option<&'a str>,
    pub color: Option<&'a str>,
}

fn insert<T>(items: &mut Vec<T>, item: T, order: InsertOrder) {
    match order {
        InsertOrder::Front => items.insert(0, item),
        InsertOrder::Back => items.push(item),
    }
}

fn non_blank(s: &str) -> Result<&str, StoreError> {
    let s = s.trim();
    if s.is_empty() {
        Err(StoreError::EmptyName)
    } else {
        Ok(s)
    }
}

/// Clone `state` and run `f` against the named project of the copy.
fn with_project<T>(
    state: &AppState,
    project_id: &str,
    f: impl FnOnce(&mut Project) -> Result<T, StoreError>,
) -> Result<(AppState, T), StoreError> {
    let mut next = state.clone();
    let project = next
        .projects
        .iter_mut()
        .find(|p| p.id == project_id)
        .ok_or_else(|| StoreError::ProjectNotFound(project_id.to_string()))?;
    let out = f(project)?;
    Ok((next, out))
}

/// Clone `state` and run `f` against the named video of the copy.
fn with_video<T>(
    state: &AppState,
    project_id: &str,
    video_id: &str,
    f: impl FnOnce(&mut Video) -> Result<T, StoreError>,
) -> Result<(AppState, T), StoreError> {
    with_project(state, project_id, |project| {
        let video = project
            .videos
            .iter_mut()
            .find(|v| v.id == video_id)
            .ok_or_else(|| StoreError::VideoNotFound(video_id.to_string()))?;
        f(video)
    })
}

// --- PROJECTS ---

/// Append a new empty project and make it current.
pub fn create_project(state: &AppState, name: &str) -> (AppState, String) {
    let mut next = state.clone();
    let id = unique_id(|id| state.project(id).is_some());
    let name = match name.trim() {
        "" => UNTITLED_PROJECT,
        trimmed => trimmed,
    };

    next.projects.push(Project::new(id.clone(), name));
    next.current_project_id = Some(id.clone());
    (next, id)
}

pub fn rename_project(state: &AppState, project_id: &str, name: &str) -> Result<AppState, StoreError> {
    let name = non_blank(name)?;
    with_project(state, project_id, |project| {
        project.name = name.to_string();
        Ok(())
    })
    .map(|(next, ())| next)
}

/// Remove a project. The collection is never left empty, and the first
/// remaining project becomes current.
pub fn delete_project(state: &AppState, project_id: &str) -> Result<AppState, StoreError> {
    if state.project(project_id).is_none() {
        return Err(StoreError::ProjectNotFound(project_id.to_string()));
    }

    let mut next = state.clone();
    next.projects.retain(|p| p.id != project_id);
    if next.projects.is_empty() {
        next.projects.push(Project::new(new_id(), DEFAULT_PROJECT_NAME));
    }
    next.current_project_id = next.projects.first().map(|p| p.id.clone());
    Ok(next)
}

pub fn set_current_project(state: &AppState, project_id: &str) -> Result<AppState, StoreError> {
    if state.project(project_id).is_none() {
        return Err(StoreError::ProjectNotFound(project_id.to_string()));
    }
    let mut next = state.clone();
    next.current_project_id = Some(project_id.to_string());
    Ok(next)
}

/// Add an imported project, regenerating any identifier that would collide
/// with the existing document or repeat inside the import. The imported
/// project becomes current.
pub fn import_project(state: &AppState, mut project: Project) -> (AppState, String) {
    if project.id.trim().is_empty() || state.project(&project.id).is_some() {
        project.id = unique_id(|id| state.project(id).is_some());
    }
    normalize_project(&mut project);

    let id = project.id.clone();
    let mut next = state.clone();
    next.projects.push(project);
    next.current_project_id = Some(id.clone());
    (next, id)
}

// --- VIDEOS ---

/// Resolve `reference` and add the video to a project.
///
/// Returns the new record's id. When the project already holds the same
/// external video the result is `DuplicateVideo` carrying the existing
/// record's id, so the caller can select it instead.
pub fn add_video(
    state: &AppState,
    project_id: &str,
    reference: &str,
    order: InsertOrder,
    playlist_aware: bool,
) -> Result<(AppState, String), StoreError> {
    let resolved = reference::resolve(reference, playlist_aware)
        .ok_or_else(|| StoreError::UnresolvableReference(reference.trim().to_string()))?;

    with_project(state, project_id, |project| {
        if let Some(existing) = project.video_by_external_id(&resolved.id) {
            return Err(StoreError::DuplicateVideo {
                id: existing.id.clone(),
            });
        }

        let id = unique_id(|id| project.video(id).is_some());
        insert(
            &mut project.videos,
            Video::new(id.clone(), &resolved, reference),
            order,
        );
        Ok(id)
    })
}

/// Add the videos of an expanded playlist, skipping ones already present.
/// The added videos keep their playlist order relative to each other and
/// remember their playlist position. Returns how many were added.
pub fn add_playlist_entries(
    state: &AppState,
    project_id: &str,
    entries: &[PlaylistEntry],
    order: InsertOrder,
) -> Result<(AppState, usize), StoreError> {
    with_project(state, project_id, |project| {
        let mut seen: HashSet<&str> = project.videos.iter().map(|v| v.video_id.as_str()).collect();
        let mut added = Vec::new();

        for entry in entries {
            if !reference::is_video_id(&entry.video_id) || !seen.insert(&entry.video_id) {
                continue;
            }

            let id = unique_id(|id| {
                project.video(id).is_some() || added.iter().any(|v: &Video| v.id == id)
            });
            let resolved = VideoRef {
                id: entry.video_id.clone(),
                kind: VideoKind::Video,
            };
            let mut video = Video::new(id, &resolved, &entry.watch_url());
            if !entry.title.trim().is_empty() {
                video.title = entry.title.trim().to_string();
            }
            video.playlist_index = Some(entry.position);
            added.push(video);
        }

        if added.is_empty() {
            return Err(StoreError::NothingToAdd);
        }

        let count = added.len();
        match order {
            InsertOrder::Front => {
                added.append(&mut project.videos);
                project.videos = added;
            }
            InsertOrder::Back => project.videos.append(&mut added),
        }
        Ok(count)
    })
}

pub fn remove_video(state: &AppState, project_id: &str, video_id: &str) -> Result<AppState, StoreError> {
    with_project(state, project_id, |project| {
        let before = project.videos.len();
        project.videos.retain(|v| v.id != video_id);
        if project.videos.len() == before {
            return Err(StoreError::VideoNotFound(video_id.to_string()));
        }
        Ok(())
    })
    .map(|(next, ())| next)
}

pub fn set_video_title(
    state: &AppState,
    project_id: &str,
    video_id: &str,
    title: &str,
) -> Result<AppState, StoreError> {
    let title = non_blank(title)?;
    with_video(state, project_id, video_id, |video| {
        video.title = title.to_string();
        Ok(())
    })
    .map(|(next, ())| next)
}

/// Record the resume position. Repeating the current value yields an equal
/// state.
pub fn set_video_last_time(
    state: &AppState,
    project_id: &str,
    video_id: &str,
    seconds: u32,
) -> Result<AppState, StoreError> {
    with_video(state, project_id, video_id, |video| {
        video.last_time = seconds;
        Ok(())
    })
    .map(|(next, ())| next)
}

pub fn set_playlist_index(
    state: &AppState,
    project_id: &str,
    video_id: &str,
    index: Option<u32>,
) -> Result<AppState, StoreError> {
    with_video(state, project_id, video_id, |video| {
        video.playlist_index = index;
        Ok(())
    })
    .map(|(next, ())| next)
}

// --- NOTES ---

/// Attach a note at `t` seconds. Whitespace-only text is rejected.
pub fn add_note(
    state: &AppState,
    project_id: &str,
    video_id: &str,
    t: u32,
    text: &str,
    order: InsertOrder,
) -> Result<(AppState, String), StoreError> {
    if text.trim().is_empty() {
        return Err(StoreError::EmptyNote);
    }
    with_video(state, project_id, video_id, |video| {
        let id = unique_id(|id| video.has_item_id(id));
        insert(&mut video.notes, Note::new(id.clone(), t, text), order);
        Ok(id)
    })
}

pub fn edit_note(
    state: &AppState,
    project_id: &str,
    video_id: &str,
    note_id: &str,
    text: &str,
) -> Result<AppState, StoreError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(StoreError::EmptyNote);
    }
    with_video(state, project_id, video_id, |video| {
        let note = video
            .notes
            .iter_mut()
            .find(|n| n.id == note_id)
            .ok_or_else(|| StoreError::NoteNotFound(note_id.to_string()))?;
        if note.text != text {
            note.text = text.to_string();
            note.updated_at = now_millis();
        }
        Ok(())
    })
    .map(|(next, ())| next)
}

pub fn delete_note(
    state: &AppState,
    project_id: &str,
    video_id: &str,
    note_id: &str,
) -> Result<AppState, StoreError> {
    with_video(state, project_id, video_id, |video| {
        let before = video.notes.len();
        video.notes.retain(|n| n.id != note_id);
        if video.notes.len() == before {
            return Err(StoreError::NoteNotFound(note_id.to_string()));
        }
        Ok(())
    })
    .map(|(next, ())| next)
}

// --- BOOKMARKS ---

/// Attach a bookmark. A blank title becomes "Bookmark" and a missing color
/// the default category.
pub fn add_bookmark(
    state: &AppState,
    project_id: &str,
    video_id: &str,
    bookmark: NewBookmark<'_>,
    order: InsertOrder,
) -> Result<(AppState, String), StoreError> {
    with_video(state, project_id, video_id, |video| {
        let id = unique_id(|id| video.has_item_id(id));
        let record = Bookmark::new(
            id.clone(),
            bookmark.t,
            bookmark.title,
            bookmark.tag,
            bookmark.color,
        );
        insert(&mut video.bookmarks, record, order);
        Ok(id)
    })
}

pub fn delete_bookmark(
    state: &AppState,
    project_id: &str,
    video_id: &str,
    bookmark_id: &str,
) -> Result<AppState, StoreError> {
    with_video(state, project_id, video_id, |video| {
        let before = video.bookmarks.len();
        video.bookmarks.retain(|b| b.id != bookmark_id);
        if video.bookmarks.len() == before {
            return Err(StoreError::BookmarkNotFound(bookmark_id.to_string()));
        }
        Ok(())
    })
    .map(|(next, ())| next)
}

/// Move one bookmark to the head of its list, keeping the others in order.
pub fn move_bookmark_to_front(
    state: &AppState,
    project_id: &str,
    video_id: &str,
    bookmark_id: &str,
) -> Result<AppState, StoreError> {
    with_video(state, project_id, video_id, |video| {
        let index = video
            .bookmarks
            .iter()
            .position(|b| b.id == bookmark_id)
            .ok_or_else(|| StoreError::BookmarkNotFound(bookmark_id.to_string()))?;
        let bookmark = video.bookmarks.remove(index);
        video.bookmarks.insert(0, bookmark);
        Ok(())
    })
    .map(|(next, ())| next)
}

// --- BOUNDARY REPAIR ---

/// Repair a document that came from outside (storage or import): the
/// project list is never empty, identifiers are unique at every level,
/// each external video appears once per project and the current pointer
/// resolves.
pub fn normalize(mut state: AppState) -> AppState {
    let mut project_ids = HashSet::new();
    for project in &mut state.projects {
        if project.id.trim().is_empty() || project_ids.contains(&project.id) {
            project.id = unique_id(|id| project_ids.contains(id));
        }
        project_ids.insert(project.id.clone());
        normalize_project(project);
    }

    if state.projects.is_empty() {
        state.projects.push(Project::new(new_id(), DEFAULT_PROJECT_NAME));
    }

    let current_ok = state
        .current_project_id
        .as_deref()
        .is_some_and(|id| state.project(id).is_some());
    if !current_ok {
        state.current_project_id = state.projects.first().map(|p| p.id.clone());
    }
    state
}

fn normalize_project(project: &mut Project) {
    let mut external = HashSet::new();
    project.videos.retain(|v| external.insert(v.video_id.clone()));

    let mut video_ids = HashSet::new();
    for video in &mut project.videos {
        if video.id.trim().is_empty() || video_ids.contains(&video.id) {
            video.id = unique_id(|id| video_ids.contains(id));
        }
        video_ids.insert(video.id.clone());

        let mut item_ids = HashSet::new();
        for note in &mut video.notes {
            if note.id.trim().is_empty() || item_ids.contains(&note.id) {
                note.id = unique_id(|id| item_ids.contains(id));
            }
            item_ids.insert(note.id.clone());
        }
        for bookmark in &mut video.bookmarks {
            if bookmark.id.trim().is_empty() || item_ids.contains(&bookmark.id) {
                bookmark.id = unique_id(|id| item_ids.contains(id));
            }
            item_ids.insert(bookmark.id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID_A: &str = "dQw4w9WgXcQ";
    const ID_B: &str = "9bZkp7q19f0";

    fn state_with_video() -> (AppState, String, String) {
        let state = AppState::default();
        let project_id = state.projects[0].id.clone();
        let (state, video_id) =
            add_video(&state, &project_id, ID_A, InsertOrder::Front, true).unwrap();
        (state, project_id, video_id)
    }

    fn all_unique<'a>(ids: impl Iterator<Item = &'a str>) -> bool {
        let mut seen = HashSet::new();
        ids.into_iter().all(|id| seen.insert(id))
    }

    #[test]
    fn test_create_project_appends_and_selects() {
        let state = AppState::default();
        let (next, id) = create_project(&state, "  Algorithms ");

        assert_eq!(state.projects.len(), 1);
        assert_eq!(next.projects.len(), 2);
        assert_eq!(next.projects[1].name, "Algorithms");
        assert_eq!(next.current_project_id.as_deref(), Some(id.as_str()));

        let (next, _) = create_project(&next, "");
        assert_eq!(next.projects[2].name, UNTITLED_PROJECT);
    }

    #[test]
    fn test_rename_project() {
        let state = AppState::default();
        let id = state.projects[0].id.clone();

        let next = rename_project(&state, &id, "Calculus").unwrap();
        assert_eq!(next.projects[0].name, "Calculus");
        assert_eq!(rename_project(&state, &id, "  "), Err(StoreError::EmptyName));
        assert!(matches!(
            rename_project(&state, "missing", "x"),
            Err(StoreError::ProjectNotFound(_))
        ));
    }

    #[test]
    fn test_deleting_every_project_leaves_one() {
        let mut state = AppState::default();
        for name in ["a", "b", "c"] {
            state = create_project(&state, name).0;
        }
        let original: Vec<String> = state.projects.iter().map(|p| p.id.clone()).collect();

        for id in &original {
            state = delete_project(&state, id).unwrap();
        }

        assert_eq!(state.projects.len(), 1);
        assert!(!original.contains(&state.projects[0].id));
        assert!(state.projects[0].videos.is_empty());
        assert_eq!(
            state.current_project_id.as_deref(),
            Some(state.projects[0].id.as_str())
        );
    }

    #[test]
    fn test_delete_selects_first_remaining() {
        let state = AppState::default();
        let first = state.projects[0].id.clone();
        let (state, second) = create_project(&state, "second");

        let next = delete_project(&state, &second).unwrap();
        assert_eq!(next.current_project_id.as_deref(), Some(first.as_str()));
        assert!(delete_project(&next, &second).is_err());
    }

    #[test]
    fn test_set_current_project_validates_target() {
        let (state, id) = create_project(&AppState::default(), "x");
        let first = state.projects[0].id.clone();

        let next = set_current_project(&state, &first).unwrap();
        assert_eq!(next.current_project_id.as_deref(), Some(first.as_str()));
        assert!(set_current_project(&state, "missing").is_err());
        assert_eq!(state.current_project_id.as_deref(), Some(id.as_str()));
    }

    #[test]
    fn test_add_video_resolves_and_inserts_front() {
        let (state, project_id, first) = state_with_video();
        let url = format!("https://www.youtube.com/watch?v={}", ID_B);
        let (state, second) =
            add_video(&state, &project_id, &url, InsertOrder::Front, true).unwrap();

        let videos = &state.project(&project_id).unwrap().videos;
        assert_eq!(videos[0].id, second);
        assert_eq!(videos[0].video_id, ID_B);
        assert_eq!(videos[0].source, url);
        assert_eq!(videos[1].id, first);
    }

    #[test]
    fn test_add_video_back_order() {
        let (state, project_id, first) = state_with_video();
        let (state, _) = add_video(&state, &project_id, ID_B, InsertOrder::Back, true).unwrap();
        assert_eq!(state.project(&project_id).unwrap().videos[0].id, first);
    }

    #[test]
    fn test_add_duplicate_video_reports_existing() {
        let (state, project_id, video_id) = state_with_video();
        let result = add_video(
            &state,
            &project_id,
            "https://youtu.be/dQw4w9WgXcQ",
            InsertOrder::Front,
            true,
        );
        assert_eq!(result, Err(StoreError::DuplicateVideo { id: video_id }));
    }

    #[test]
    fn test_add_unresolvable_video() {
        let state = AppState::default();
        let project_id = state.projects[0].id.clone();
        let result = add_video(&state, &project_id, "not a link", InsertOrder::Front, true);
        assert!(matches!(result, Err(StoreError::UnresolvableReference(_))));
    }

    #[test]
    fn test_add_playlist_entries_skips_present_videos() {
        let (state, project_id, _) = state_with_video();
        let entries = vec![
            PlaylistEntry {
                video_id: ID_A.into(),
                title: "Already here".into(),
                position: 0,
            },
            PlaylistEntry {
                video_id: ID_B.into(),
                title: "Lecture 2".into(),
                position: 1,
            },
            PlaylistEntry {
                video_id: "kJQP7kiw5Fk".into(),
                title: "Lecture 3".into(),
                position: 2,
            },
        ];

        let (next, added) =
            add_playlist_entries(&state, &project_id, &entries, InsertOrder::Front).unwrap();
        assert_eq!(added, 2);

        let videos = &next.project(&project_id).unwrap().videos;
        assert_eq!(videos.len(), 3);
        assert_eq!(videos[0].title, "Lecture 2");
        assert_eq!(videos[0].playlist_index, Some(1));
        assert_eq!(videos[1].title, "Lecture 3");
        assert_eq!(videos[2].video_id, ID_A);

        assert_eq!(
            add_playlist_entries(&next, &project_id, &entries, InsertOrder::Front),
            Err(StoreError::NothingToAdd)
        );
    }

    #[test]
    fn test_remove_video() {
        let (state, project_id, video_id) = state_with_video();
        let next = remove_video(&state, &project_id, &video_id).unwrap();
        assert!(next.project(&project_id).unwrap().videos.is_empty());
        assert!(remove_video(&next, &project_id, &video_id).is_err());
    }

    #[test]
    fn test_set_video_title() {
        let (state, project_id, video_id) = state_with_video();
        let next = set_video_title(&state, &project_id, &video_id, "Lecture 1").unwrap();
        assert_eq!(next.video(&project_id, &video_id).unwrap().title, "Lecture 1");
        assert_eq!(
            set_video_title(&state, &project_id, &video_id, " "),
            Err(StoreError::EmptyName)
        );
    }

    #[test]
    fn test_set_last_time_is_idempotent() {
        let (state, project_id, video_id) = state_with_video();
        let once = set_video_last_time(&state, &project_id, &video_id, 125).unwrap();
        let twice = set_video_last_time(&once, &project_id, &video_id, 125).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once.video(&project_id, &video_id).unwrap().last_time, 125);
        assert_eq!(state.video(&project_id, &video_id).unwrap().last_time, 0);
    }

    #[test]
    fn test_set_playlist_index() {
        let (state, project_id, video_id) = state_with_video();
        let next = set_playlist_index(&state, &project_id, &video_id, Some(4)).unwrap();
        assert_eq!(next.video(&project_id, &video_id).unwrap().playlist_index, Some(4));
    }

    #[test]
    fn test_whitespace_note_is_rejected() {
        let (state, project_id, video_id) = state_with_video();
        let result = add_note(&state, &project_id, &video_id, 10, " \n\t ", InsertOrder::Front);

        assert_eq!(result, Err(StoreError::EmptyNote));
        assert!(state.video(&project_id, &video_id).unwrap().notes.is_empty());
    }

    #[test]
    fn test_note_lifecycle() {
        let (state, project_id, video_id) = state_with_video();
        let (state, first) =
            add_note(&state, &project_id, &video_id, 10, "intro", InsertOrder::Front).unwrap();
        let (state, second) =
            add_note(&state, &project_id, &video_id, 90, "proof", InsertOrder::Front).unwrap();

        let notes = &state.video(&project_id, &video_id).unwrap().notes;
        assert_eq!(notes[0].id, second);
        assert_eq!(notes[1].id, first);
        assert_eq!(notes[1].t, 10);

        let state = edit_note(&state, &project_id, &video_id, &first, " updated ").unwrap();
        let video = state.video(&project_id, &video_id).unwrap();
        let edited = video.notes.iter().find(|n| n.id == first).unwrap();
        assert_eq!(edited.text, "updated");
        assert_eq!(
            edit_note(&state, &project_id, &video_id, &first, ""),
            Err(StoreError::EmptyNote)
        );

        let state = delete_note(&state, &project_id, &video_id, &first).unwrap();
        let video = state.video(&project_id, &video_id).unwrap();
        assert!(video.notes.iter().all(|n| n.id != first));
        assert_eq!(video.notes.len(), 1);
        assert!(matches!(
            delete_note(&state, &project_id, &video_id, &first),
            Err(StoreError::NoteNotFound(_))
        ));
    }

    #[test]
    fn test_bookmark_defaults_and_reorder() {
        let (state, project_id, video_id) = state_with_video();
        let mut ids = Vec::new();
        let mut state = state;
        for t in [5, 15, 25] {
            let (next, id) = add_bookmark(
                &state,
                &project_id,
                &video_id,
                NewBookmark {
                    t,
                    ..Default::default()
                },
                InsertOrder::Front,
            )
            .unwrap();
            state = next;
            ids.push(id);
        }

        let video = state.video(&project_id, &video_id).unwrap();
        assert_eq!(video.bookmarks[0].title, "Bookmark");
        assert_eq!(video.bookmarks[0].color, "blue");
        let order: Vec<u32> = video.bookmarks.iter().map(|b| b.t).collect();
        assert_eq!(order, vec![25, 15, 5]);

        let state = move_bookmark_to_front(&state, &project_id, &video_id, &ids[0]).unwrap();
        let order: Vec<u32> = state
            .video(&project_id, &video_id)
            .unwrap()
            .bookmarks
            .iter()
            .map(|b| b.t)
            .collect();
        assert_eq!(order, vec![5, 25, 15]);

        let state = delete_bookmark(&state, &project_id, &video_id, &ids[1]).unwrap();
        assert_eq!(state.video(&project_id, &video_id).unwrap().bookmarks.len(), 2);
        assert!(move_bookmark_to_front(&state, &project_id, &video_id, &ids[1]).is_err());
    }

    #[test]
    fn test_missing_targets_leave_state_alone() {
        let (state, project_id, video_id) = state_with_video();
        assert!(matches!(
            add_note(&state, &project_id, "nope", 1, "x", InsertOrder::Front),
            Err(StoreError::VideoNotFound(_))
        ));
        assert!(matches!(
            add_note(&state, "nope", &video_id, 1, "x", InsertOrder::Front),
            Err(StoreError::ProjectNotFound(_))
        ));
        assert!(matches!(
            delete_bookmark(&state, &project_id, &video_id, "nope"),
            Err(StoreError::BookmarkNotFound(_))
        ));
    }

    #[test]
    fn test_ids_stay_unique_across_operations() {
        let mut state = AppState::default();
        for round in 0..3 {
            let (next, project_id) = create_project(&state, &format!("p{round}"));
            state = next;
            for reference in [ID_A, ID_B, "kJQP7kiw5Fk"] {
                let (next, video_id) =
                    add_video(&state, &project_id, reference, InsertOrder::Front, true).unwrap();
                state = next;
                for t in 0..4 {
                    state = add_note(&state, &project_id, &video_id, t, "n", InsertOrder::Front)
                        .unwrap()
                        .0;
                    state = add_bookmark(
                        &state,
                        &project_id,
                        &video_id,
                        NewBookmark {
                            t,
                            ..Default::default()
                        },
                        InsertOrder::Front,
                    )
                    .unwrap()
                    .0;
                }
            }
        }

        assert!(all_unique(state.projects.iter().map(|p| p.id.as_str())));
        for project in &state.projects {
            assert!(all_unique(project.videos.iter().map(|v| v.id.as_str())));
            assert!(all_unique(project.videos.iter().map(|v| v.video_id.as_str())));
            for video in &project.videos {
                let items = video
                    .notes
                    .iter()
                    .map(|n| n.id.as_str())
                    .chain(video.bookmarks.iter().map(|b| b.id.as_str()));
                assert!(all_unique(items));
            }
        }
    }

    #[test]
    fn test_import_same_project_twice_regenerates_id() {
        let (state, project_id, video_id) = state_with_video();
        let (state, _) =
            add_note(&state, &project_id, &video_id, 30, "key idea", InsertOrder::Front).unwrap();
        let exported = state.project(&project_id).unwrap().clone();

        let (state, first_import) = import_project(&state, exported.clone());
        let (state, second_import) = import_project(&state, exported.clone());

        assert_ne!(first_import, project_id);
        assert_ne!(second_import, first_import);
        assert_eq!(state.projects.len(), 3);
        assert_eq!(state.current_project_id.as_deref(), Some(second_import.as_str()));

        let imported = state.project(&second_import).unwrap();
        assert_eq!(imported.videos, exported.videos);
        assert_eq!(imported.name, exported.name);
    }

    #[test]
    fn test_normalize_repairs_boundary_input() {
        let (state, project_id, video_id) = state_with_video();
        let mut broken = state.clone();
        let project = broken.projects[0].clone();
        broken.projects.push(project);
        let video = broken.projects[0].videos[0].clone();
        broken.projects[0].videos.push(video);
        broken.current_project_id = Some("dangling".into());

        let fixed = normalize(broken);
        assert_eq!(fixed.projects.len(), 2);
        assert_ne!(fixed.projects[0].id, fixed.projects[1].id);
        assert_eq!(fixed.projects[0].videos.len(), 1);
        assert_eq!(fixed.projects[0].videos[0].id, video_id);
        assert_eq!(fixed.current_project_id.as_deref(), Some(project_id.as_str()));

        let empty = normalize(AppState {
            projects: Vec::new(),
            current_project_id: None,
        });
        assert_eq!(empty.projects.len(), 1);
        assert!(empty.current_project().is_some());
    }

    #[test]
    fn test_normalize_repairs_note_and_bookmark_ids() {
        let (mut state, _, _) = state_with_video();
        let video = &mut state.projects[0].videos[0];
        video.notes = vec![
            Note::new("n1".into(), 10, "first"),
            Note::new("n1".into(), 20, "second"),
            Note::new(String::new(), 30, "third"),
        ];
        video.bookmarks = vec![
            Bookmark::new("n1".into(), 40, Some("Clash"), None, None),
            Bookmark::new(" ".into(), 50, None, None, None),
        ];

        let check = |state: &AppState| {
            for video in state.projects.iter().flat_map(|p| &p.videos) {
                let items: Vec<&str> = video
                    .notes
                    .iter()
                    .map(|n| n.id.as_str())
                    .chain(video.bookmarks.iter().map(|b| b.id.as_str()))
                    .collect();
                assert!(items.iter().all(|id| !id.trim().is_empty()));
                assert!(all_unique(items.into_iter()));
                assert_eq!(video.notes[0].id, "n1");
                assert_eq!(video.notes.len(), 3);
                assert_eq!(video.bookmarks.len(), 2);
            }
        };

        let fixed = normalize(state.clone());
        check(&fixed);

        let imported = state.projects[0].clone();
        let (next, id) = import_project(&AppState::default(), imported);
        assert!(next.project(&id).is_some());
        check(&next);
    }
}
