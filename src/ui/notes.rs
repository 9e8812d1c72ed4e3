// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Notes panel: composer and list for the open video.

use crate::models::Video;
use crate::util::timecode::format_whole_seconds;

/// Result of notes panel interaction.
pub enum NotesAction {
    None,
    Add(String),
    Seek(u32),
    Save(String, String),
    Delete(String),
}

/// Text typed into the notes panel between frames.
#[derive(Default)]
pub struct NotesDraft {
    pub text: String,
    /// Note being edited and its text so far.
    pub editing: Option<(String, String)>,
}

/// Display the notes panel. `now` is the playback second new notes attach to.
pub fn show(ui: &mut egui::Ui, video: &Video, now: u32, draft: &mut NotesDraft) -> NotesAction {
    let mut action = NotesAction::None;

    ui.heading(format!("Notes ({})", video.notes.len()));
    ui.add(
        egui::TextEdit::multiline(&mut draft.text)
            .hint_text("Markdown note")
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
    ui.horizontal(|ui| {
        if ui
            .button(format!("Add note at {}", format_whole_seconds(now)))
            .clicked()
        {
            action = NotesAction::Add(draft.text.clone());
        }
    });
    ui.separator();

    egui::ScrollArea::vertical().id_source("notes").show(ui, |ui| {
        for note in &video.notes {
            ui.horizontal(|ui| {
                if ui
                    .link(format!("[{}]", format_whole_seconds(note.t)))
                    .on_hover_text("Jump here")
                    .clicked()
                {
                    action = NotesAction::Seek(note.t);
                }

                let editing_this = matches!(&draft.editing, Some((id, _)) if id == &note.id);
                if editing_this {
                    if ui.small_button("💾").on_hover_text("Save").clicked() {
                        if let Some((id, text)) = &draft.editing {
                            action = NotesAction::Save(id.clone(), text.clone());
                        }
                    }
                    if ui.small_button("✖").on_hover_text("Cancel").clicked() {
                        draft.editing = None;
                    }
                } else {
                    if ui.small_button("✏").on_hover_text("Edit").clicked() {
                        draft.editing = Some((note.id.clone(), note.text.clone()));
                    }
                    if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                        action = NotesAction::Delete(note.id.clone());
                    }
                }
            });

            match draft.editing.as_mut() {
                Some((id, text)) if id == &note.id => {
                    ui.add(
                        egui::TextEdit::multiline(text)
                            .desired_rows(3)
                            .desired_width(f32::INFINITY),
                    );
                }
                _ => {
                    ui.label(&note.text);
                }
            }
            ui.add_space(6.0);
        }
    });

    action
}
