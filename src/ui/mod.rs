// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the TubeNotes application.
//!
//! Each panel draws from a borrowed `AppState` and reports what the user
//! did as an action value; `app.rs` turns actions into store operations.

pub mod bookmarks;
pub mod notes;
pub mod projects;
pub mod transport;

/// Display color for a bookmark color category.
pub fn category_color(name: &str) -> egui::Color32 {
    match name {
        "green" => egui::Color32::from_rgb(80, 180, 90),
        "yellow" => egui::Color32::from_rgb(220, 190, 60),
        "red" => egui::Color32::from_rgb(210, 70, 70),
        "purple" => egui::Color32::from_rgb(150, 100, 210),
        _ => egui::Color32::from_rgb(70, 140, 220),
    }
}
