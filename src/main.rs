// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! TubeNotes - a local study companion for YouTube videos
//!
//! Organize videos into projects, take timestamped notes, set bookmarks
//! and pick up where you left off. Everything is stored on this machine.

mod app;
mod config;
mod error;
mod io;
mod models;
mod notify;
mod playback;
mod player;
mod playlist;
mod reference;
mod store;
mod ui;
mod util;

use anyhow::Result;
use app::TubeNotesApp;
use config::Config;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {:#}", e);
        Config::default()
    });

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 760.0])
            .with_min_inner_size([900.0, 560.0])
            .with_title("TubeNotes"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "TubeNotes",
        options,
        Box::new(move |_cc| Ok(Box::new(TubeNotesApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
