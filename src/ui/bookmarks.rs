// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Bookmarks panel: composer and list for the open video.

use crate::models::bookmark::{COLORS, DEFAULT_COLOR};
use crate::models::Video;
use crate::util::timecode::format_whole_seconds;

/// Result of bookmarks panel interaction.
pub enum BookmarksAction {
    None,
    Add,
    Seek(u32),
    MoveToFront(String),
    Delete(String),
}

/// Fields typed into the bookmark composer between frames.
pub struct BookmarksDraft {
    pub title: String,
    pub tag: String,
    pub color: String,
}

impl Default for BookmarksDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            tag: String::new(),
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

/// Display the bookmarks panel.
pub fn show(
    ui: &mut egui::Ui,
    video: &Video,
    now: u32,
    draft: &mut BookmarksDraft,
) -> BookmarksAction {
    let mut action = BookmarksAction::None;

    ui.heading(format!("Bookmarks ({})", video.bookmarks.len()));
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut draft.title)
                .hint_text("Bookmark")
                .desired_width(140.0),
        );
        ui.add(
            egui::TextEdit::singleline(&mut draft.tag)
                .hint_text("tag")
                .desired_width(70.0),
        );
        egui::ComboBox::from_id_source("bookmark_color")
            .selected_text(
                egui::RichText::new(draft.color.as_str())
                    .color(super::category_color(&draft.color)),
            )
            .show_ui(ui, |ui| {
                for color in COLORS {
                    ui.selectable_value(
                        &mut draft.color,
                        color.to_string(),
                        egui::RichText::new(color).color(super::category_color(color)),
                    );
                }
            });
    });
    if ui
        .button(format!("🔖 Bookmark {}", format_whole_seconds(now)))
        .clicked()
    {
        action = BookmarksAction::Add;
    }
    ui.separator();

    egui::ScrollArea::vertical().id_source("bookmarks").show(ui, |ui| {
        for (index, bookmark) in video.bookmarks.iter().enumerate() {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("●").color(super::category_color(&bookmark.color)),
                );
                if ui
                    .link(format!("[{}]", format_whole_seconds(bookmark.t)))
                    .clicked()
                {
                    action = BookmarksAction::Seek(bookmark.t);
                }
                ui.label(&bookmark.title);
                if let Some(tag) = &bookmark.tag {
                    ui.label(egui::RichText::new(format!("#{}", tag)).weak());
                }
                if index > 0
                    && ui
                        .small_button("⤒")
                        .on_hover_text("Move to top")
                        .clicked()
                {
                    action = BookmarksAction::MoveToFront(bookmark.id.clone());
                }
                if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                    action = BookmarksAction::Delete(bookmark.id.clone());
                }
            });
        }
    });

    action
}
