// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback controls for the open video.
//!
//! Shows the title, the playback clock and the transport buttons, plus a
//! link that opens the video in the browser at the current position.

use crate::models::{Video, VideoKind};
use crate::player::PlayerState;
use crate::util::timecode::{format_seconds, parse_timestamp};

/// Result of transport interaction.
pub enum TransportAction {
    None,
    TogglePlay,
    SeekTo(f64),
    SeekBy(f64),
    Rename(String),
    SetPlaylistIndex(Option<u32>),
    ExpandPlaylist,
    Remind(u32),
}

/// Text typed into the transport bar between frames.
pub struct TransportDraft {
    pub title: String,
    pub goto: String,
    pub remind_minutes: u32,
}

impl Default for TransportDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            goto: String::new(),
            remind_minutes: 25,
        }
    }
}

/// Display the transport bar.
pub fn show(
    ui: &mut egui::Ui,
    video: &Video,
    current_time: f64,
    player_state: PlayerState,
    expanding: bool,
    draft: &mut TransportDraft,
) -> TransportAction {
    let mut action = TransportAction::None;

    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut draft.title)
                .font(egui::TextStyle::Heading)
                .desired_width(ui.available_width() * 0.6),
        );
        if response.lost_focus() && draft.title.trim() != video.title {
            action = TransportAction::Rename(draft.title.clone());
        }

        let seconds = crate::models::clamp_seconds(current_time);
        ui.hyperlink_to("Open on YouTube ↗", video.watch_url(seconds));
    });

    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(format_seconds(current_time))
                .monospace()
                .size(22.0),
        );
        ui.separator();

        if ui.button("⏪ 10s").clicked() {
            action = TransportAction::SeekBy(-10.0);
        }
        let play_label = match player_state {
            PlayerState::Playing => "⏸ Pause",
            _ => "▶ Play",
        };
        if ui.button(play_label).on_hover_text("Space").clicked() {
            action = TransportAction::TogglePlay;
        }
        if ui.button("10s ⏩").clicked() {
            action = TransportAction::SeekBy(10.0);
        }

        ui.separator();
        let response = ui.add(
            egui::TextEdit::singleline(&mut draft.goto)
                .hint_text("m:ss")
                .desired_width(70.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Go").clicked() || submitted {
            if let Some(seconds) = parse_timestamp(&draft.goto) {
                action = TransportAction::SeekTo(seconds as f64);
                draft.goto.clear();
            }
        }
    });

    ui.horizontal(|ui| {
        if video.kind == VideoKind::Playlist {
            ui.label("Resume at item");
            let mut item = video.playlist_index.map(|i| i + 1).unwrap_or(1);
            let response = ui.add(egui::DragValue::new(&mut item).clamp_range(1..=5000));
            if response.changed() {
                action = TransportAction::SetPlaylistIndex(Some(item - 1));
            }
            if video.playlist_index.is_some() && ui.small_button("✖").clicked() {
                action = TransportAction::SetPlaylistIndex(None);
            }
            ui.separator();

            if expanding {
                ui.spinner();
                ui.label("Fetching playlist...");
            } else if ui.button("☰ Add playlist videos").clicked() {
                action = TransportAction::ExpandPlaylist;
            }
            ui.separator();
        }

        ui.label("Remind me to resume in");
        ui.add(
            egui::DragValue::new(&mut draft.remind_minutes)
                .clamp_range(1..=240)
                .suffix(" min"),
        );
        if ui.button("⏰ Set").clicked() {
            action = TransportAction::Remind(draft.remind_minutes);
        }
    });

    action
}
