// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project and video sidebar.
//!
//! Lists projects (create, rename, delete, switch) and the videos of the
//! current project, with a field for pasting a new video reference.

use crate::models::{AppState, VideoKind};

/// Result of sidebar interaction.
pub enum ProjectsAction {
    None,
    SelectProject(String),
    CreateProject(String),
    RenameProject(String, String),
    DeleteProject(String),
    OpenVideo(String),
    AddVideo(String),
    RemoveVideo(String),
}

/// Text typed into the sidebar between frames.
#[derive(Default)]
pub struct ProjectsDraft {
    pub new_project: String,
    /// Project being renamed and the name typed so far.
    pub renaming: Option<(String, String)>,
    pub reference: String,
}

/// Display the sidebar.
pub fn show(
    ui: &mut egui::Ui,
    state: &AppState,
    open_video: Option<&str>,
    draft: &mut ProjectsDraft,
) -> ProjectsAction {
    let mut action = ProjectsAction::None;
    let current = state.current_project();

    ui.heading("Projects");
    ui.separator();

    egui::ScrollArea::vertical()
        .id_source("projects")
        .max_height(200.0)
        .show(ui, |ui| {
            for project in &state.projects {
                let is_current = current.map(|p| p.id == project.id).unwrap_or(false);

                let renaming_this = draft
                    .renaming
                    .as_ref()
                    .map(|(id, _)| id == &project.id)
                    .unwrap_or(false);

                if renaming_this {
                    ui.horizontal(|ui| {
                        if let Some((id, name)) = draft.renaming.as_mut() {
                            let response = ui.text_edit_singleline(name);
                            let submitted = response.lost_focus()
                                && ui.input(|i| i.key_pressed(egui::Key::Enter));
                            if ui.button("✔").clicked() || submitted {
                                action = ProjectsAction::RenameProject(id.clone(), name.clone());
                            }
                        }
                        if ui.button("✖").clicked() {
                            draft.renaming = None;
                        }
                    });
                    continue;
                }

                ui.horizontal(|ui| {
                    let label = format!("{} ({})", project.name, project.videos.len());
                    if ui.selectable_label(is_current, label).clicked() && !is_current {
                        action = ProjectsAction::SelectProject(project.id.clone());
                    }
                    if ui.small_button("✏").on_hover_text("Rename").clicked() {
                        draft.renaming = Some((project.id.clone(), project.name.clone()));
                    }
                    if ui.small_button("🗑").on_hover_text("Delete project").clicked() {
                        action = ProjectsAction::DeleteProject(project.id.clone());
                    }
                });
            }
        });

    ui.horizontal(|ui| {
        ui.add(egui::TextEdit::singleline(&mut draft.new_project).hint_text("New project"));
        if ui.button("➕").clicked() {
            action = ProjectsAction::CreateProject(std::mem::take(&mut draft.new_project));
        }
    });

    ui.add_space(12.0);
    ui.heading("Videos");
    ui.separator();

    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut draft.reference)
                .hint_text("YouTube link or video id"),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (ui.button("Add").clicked() || submitted) && !draft.reference.trim().is_empty() {
            action = ProjectsAction::AddVideo(draft.reference.clone());
        }
    });

    let Some(project) = current else {
        return action;
    };

    if project.videos.is_empty() {
        ui.label(egui::RichText::new("Paste a link above to add a video").italics().weak());
    }

    egui::ScrollArea::vertical().id_source("videos").show(ui, |ui| {
        for video in &project.videos {
            let is_open = open_video == Some(video.id.as_str());
            ui.horizontal(|ui| {
                let icon = match video.kind {
                    VideoKind::Video => "▶",
                    VideoKind::Playlist => "☰",
                };
                let label = format!("{} {}", icon, video.title);
                if ui.selectable_label(is_open, label).clicked() && !is_open {
                    action = ProjectsAction::OpenVideo(video.id.clone());
                }
                if ui.small_button("🗑").on_hover_text("Remove video").clicked() {
                    action = ProjectsAction::RemoveVideo(video.id.clone());
                }
            });
        }
    });

    action
}
