// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! `TubeNotesApp` owns the document store, the playback clock and the
//! timers that poll it. UI panels report actions; this module turns them
//! into store operations and surfaces any rejection in the status bar.

use crate::config::Config;
use crate::error::{FetchError, StoreError};
use crate::io::{outline, serialization, storage::FileKeyValueStore};
use crate::io::outline::OutlineOrder;
use crate::models::{clamp_seconds, Video, VideoKind};
use crate::notify::{Notifier, Permission, ReminderQueue};
use crate::playback::{Interval, ResumeWatcher};
use crate::player::{ClockPlayer, PlayerHandle, PlayerState};
use crate::playlist::{self, Expansion};
use crate::store::{ops, DocumentStore, InsertOrder, SubscriptionId};
use crate::ui::{bookmarks, notes, projects, transport};
use crate::util::timecode::format_whole_seconds;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

/// Message shown in the status bar.
enum Status {
    Info(String),
    Error(String),
}

/// Playlist expansion running in the background.
struct PendingExpansion {
    project_id: String,
    receiver: Receiver<Result<Expansion, FetchError>>,
}

/// Main application state.
pub struct TubeNotesApp {
    config: Config,
    store: DocumentStore<FileKeyValueStore>,

    /// Number of committed changes this session
    revision: Rc<Cell<u64>>,
    subscription: SubscriptionId,

    /// Video record open in the current project
    open_video: Option<String>,

    player: PlayerHandle,
    /// Playback position as last read by the display ticker
    shown_time: f64,
    ticker: Interval,
    watcher_timer: Interval,
    watcher: ResumeWatcher,

    reminders: ReminderQueue,
    expansion: Option<PendingExpansion>,
    status: Option<Status>,

    projects_draft: projects::ProjectsDraft,
    transport_draft: transport::TransportDraft,
    notes_draft: notes::NotesDraft,
    bookmarks_draft: bookmarks::BookmarksDraft,
}

impl TubeNotesApp {
    /// Create the application, loading the saved document.
    pub fn new(config: Config) -> Self {
        let mut store = DocumentStore::open(FileKeyValueStore::new(config.data_dir()));
        log::info!("Using data directory {}", store.backend().dir().display());

        let revision = Rc::new(Cell::new(0));
        let counter = Rc::clone(&revision);
        let subscription = store.subscribe(move |_| counter.set(counter.get() + 1));

        let now = Instant::now();
        let mut watcher_timer =
            Interval::new(config.watcher_interval().unwrap_or_default(), now);
        if config.watcher_interval().is_none() {
            log::info!("Periodic resume saving is off");
            watcher_timer.cancel();
        }
        let permission = Permission::from_setting(config.notifications_enabled);

        Self {
            ticker: Interval::new(config.ticker_interval(), now),
            watcher_timer,
            watcher: ResumeWatcher::new(config.resume_drift_secs),
            reminders: ReminderQueue::new(permission),
            config,
            store,
            revision,
            subscription,
            open_video: None,
            player: PlayerHandle::new(),
            shown_time: 0.0,
            expansion: None,
            status: None,
            projects_draft: Default::default(),
            transport_draft: Default::default(),
            notes_draft: Default::default(),
            bookmarks_draft: Default::default(),
        }
    }

    fn info(&mut self, message: impl Into<String>) {
        self.status = Some(Status::Info(message.into()));
    }

    fn error(&mut self, message: impl Into<String>) {
        self.status = Some(Status::Error(message.into()));
    }

    /// Surface a rejected change; pass a successful result through.
    fn report<T>(&mut self, result: Result<T, StoreError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Change rejected: {}", e);
                self.error(e.to_string());
                None
            }
        }
    }

    fn current_project_id(&self) -> Option<String> {
        self.store.state().current_project().map(|p| p.id.clone())
    }

    fn current_video(&self) -> Option<&Video> {
        let project = self.store.state().current_project()?;
        project.video(self.open_video.as_deref()?)
    }

    fn watcher_key(project_id: &str, video_id: &str) -> String {
        format!("{}/{}", project_id, video_id)
    }

    // --- VIDEO LIFECYCLE ---

    /// Open a video of the current project and park the clock at its
    /// resume position.
    fn open_video(&mut self, video_id: String) {
        self.flush_resume();

        let Some(project_id) = self.current_project_id() else {
            return;
        };
        let Some(video) = self.store.state().video(&project_id, &video_id) else {
            return;
        };

        let last_time = video.last_time;
        self.transport_draft.title = video.title.clone();
        self.notes_draft.editing = None;

        self.player.attach(Box::new(ClockPlayer::new(last_time as f64)));
        self.shown_time = last_time as f64;
        self.watcher
            .remember(&Self::watcher_key(&project_id, &video_id), last_time);
        log::info!("Opened video {} at {}", video_id, format_whole_seconds(last_time));
        self.open_video = Some(video_id);
    }

    fn close_video(&mut self) {
        self.flush_resume();
        self.player.detach();
        self.open_video = None;
        self.shown_time = 0.0;
    }

    /// Save the exact playback position of the open video, ignoring the
    /// drift threshold.
    fn flush_resume(&mut self) {
        let (Some(project_id), Some(video_id)) = (self.current_project_id(), self.open_video.clone())
        else {
            return;
        };
        if !self.player.is_attached() {
            return;
        }

        let seconds = clamp_seconds(self.player.current_time());
        let result = self
            .store
            .update(|s| ops::set_video_last_time(s, &project_id, &video_id, seconds));
        if result.is_ok() {
            self.watcher
                .remember(&Self::watcher_key(&project_id, &video_id), seconds);
        }
    }

    /// Drop the open video if it vanished from the current project.
    fn check_open_video(&mut self) {
        if self.open_video.is_some() && self.current_video().is_none() {
            self.player.detach();
            self.open_video = None;
        }
    }

    // --- TIMERS ---

    fn run_timers(&mut self, now: Instant) {
        if self.ticker.tick(now) {
            self.shown_time = self.player.current_time();
        }

        if self.watcher_timer.tick(now) && self.player.state() == PlayerState::Playing {
            if let (Some(project_id), Some(video_id)) =
                (self.current_project_id(), self.open_video.clone())
            {
                let key = Self::watcher_key(&project_id, &video_id);
                if let Some(seconds) = self.watcher.observe(&key, self.player.current_time()) {
                    log::debug!("Saving resume position {}s for {}", seconds, video_id);
                    let result = self
                        .store
                        .update(|s| ops::set_video_last_time(s, &project_id, &video_id, seconds));
                    self.report(result);
                }
            }
        }

        for reminder in self.reminders.take_due(now) {
            log::info!("Reminder: {} - {}", reminder.title, reminder.body);
            self.info(format!("⏰ {}: {}", reminder.title, reminder.body));
        }
    }

    fn poll_expansion(&mut self) {
        let Some(pending) = &self.expansion else {
            return;
        };
        let result = match pending.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                self.expansion = None;
                self.error("Playlist fetch stopped unexpectedly");
                return;
            }
        };
        let project_id = pending.project_id.clone();
        self.expansion = None;

        match result {
            Ok(expansion) => {
                let order = self.config.insert_order;
                let added = self.store.apply(|s| {
                    ops::add_playlist_entries(s, &project_id, &expansion.entries, order)
                });
                let Some(count) = self.report(added) else {
                    return;
                };
                match expansion.interrupted {
                    Some(e) => self.error(format!(
                        "Added {} videos, but the rest of the playlist failed: {}",
                        count, e
                    )),
                    None => self.info(format!(
                        "Added {} videos from playlist {}",
                        count, expansion.playlist_id
                    )),
                }
            }
            Err(e) => self.error(e.to_string()),
        }
    }

    // --- ACTIONS ---

    fn handle_projects(&mut self, action: projects::ProjectsAction) {
        use projects::ProjectsAction;

        match action {
            ProjectsAction::None => {}
            ProjectsAction::SelectProject(id) => {
                self.close_video();
                let result = self.store.update(|s| ops::set_current_project(s, &id));
                self.report(result);
            }
            ProjectsAction::CreateProject(name) => {
                self.close_video();
                let id = self.store.apply(|s| Ok(ops::create_project(s, &name)));
                if let Some(id) = self.report(id) {
                    log::info!("Created project {}", id);
                }
            }
            ProjectsAction::RenameProject(id, name) => {
                let result = self.store.update(|s| ops::rename_project(s, &id, &name));
                if self.report(result).is_some() {
                    self.projects_draft.renaming = None;
                }
            }
            ProjectsAction::DeleteProject(id) => {
                // The first remaining project becomes current, so save the
                // open video's position while it can still be found.
                self.close_video();
                let result = self.store.update(|s| ops::delete_project(s, &id));
                if self.report(result).is_some() {
                    log::info!("Deleted project {}", id);
                }
            }
            ProjectsAction::OpenVideo(id) => self.open_video(id),
            ProjectsAction::AddVideo(reference) => self.add_video(&reference),
            ProjectsAction::RemoveVideo(id) => {
                let Some(project_id) = self.current_project_id() else {
                    return;
                };
                if self.open_video.as_deref() == Some(id.as_str()) {
                    self.player.detach();
                    self.open_video = None;
                }
                let result = self.store.update(|s| ops::remove_video(s, &project_id, &id));
                self.report(result);
                self.watcher.forget(&Self::watcher_key(&project_id, &id));
            }
        }
    }

    fn add_video(&mut self, reference: &str) {
        let Some(project_id) = self.current_project_id() else {
            return;
        };
        let order = self.config.insert_order;
        let aware = self.config.playlist_aware;

        match self
            .store
            .apply(|s| ops::add_video(s, &project_id, reference, order, aware))
        {
            Ok(id) => {
                log::info!("Added video {} to project {}", id, project_id);
                self.projects_draft.reference.clear();
                self.open_video(id);
                self.info("Video added");
            }
            Err(StoreError::DuplicateVideo { id }) => {
                self.projects_draft.reference.clear();
                self.open_video(id);
                self.info("That video is already in this project");
            }
            Err(e) => {
                self.report::<()>(Err(e));
            }
        }
    }

    fn handle_transport(&mut self, action: transport::TransportAction) {
        use transport::TransportAction;

        match action {
            TransportAction::None => {}
            TransportAction::TogglePlay => self.player.toggle(),
            TransportAction::SeekTo(seconds) => self.player.seek_to(seconds),
            TransportAction::SeekBy(delta) => {
                let target = self.player.current_time() + delta;
                self.player.seek_to(target);
            }
            TransportAction::Rename(title) => {
                let (Some(project_id), Some(video_id)) =
                    (self.current_project_id(), self.open_video.clone())
                else {
                    return;
                };
                let result = self
                    .store
                    .update(|s| ops::set_video_title(s, &project_id, &video_id, &title));
                if self.report(result).is_none() {
                    let title = self.current_video().map(|v| v.title.clone());
                    self.transport_draft.title = title.unwrap_or_default();
                }
            }
            TransportAction::SetPlaylistIndex(index) => {
                let (Some(project_id), Some(video_id)) =
                    (self.current_project_id(), self.open_video.clone())
                else {
                    return;
                };
                let result = self
                    .store
                    .update(|s| ops::set_playlist_index(s, &project_id, &video_id, index));
                self.report(result);
            }
            TransportAction::ExpandPlaylist => self.expand_playlist(),
            TransportAction::Remind(minutes) => self.schedule_reminder(minutes),
        }
        self.shown_time = self.player.current_time();
    }

    fn expand_playlist(&mut self) {
        let Some(project_id) = self.current_project_id() else {
            return;
        };
        let Some(video) = self.current_video() else {
            return;
        };
        if video.kind != VideoKind::Playlist {
            return;
        }

        let playlist_id = video.video_id.clone();
        log::info!("Expanding playlist {}", playlist_id);
        self.expansion = Some(PendingExpansion {
            project_id,
            receiver: playlist::spawn_expand(self.config.api_key(), playlist_id),
        });
    }

    fn schedule_reminder(&mut self, minutes: u32) {
        let Some(video) = self.current_video() else {
            return;
        };
        let title = format!("Resume \"{}\"", video.title);
        let body = format!(
            "Pick up at {}",
            format_whole_seconds(clamp_seconds(self.player.current_time()))
        );

        match self.reminders.schedule(&title, &body, minutes) {
            Ok(()) => self.info(format!("Reminder set for {} min from now", minutes)),
            Err(e) => self.error(e.to_string()),
        }
    }

    fn handle_notes(&mut self, action: notes::NotesAction) {
        use notes::NotesAction;

        let (Some(project_id), Some(video_id)) = (self.current_project_id(), self.open_video.clone())
        else {
            return;
        };

        match action {
            NotesAction::None => {}
            NotesAction::Seek(t) => {
                self.player.seek_to(t as f64);
                self.shown_time = self.player.current_time();
            }
            NotesAction::Add(text) => {
                let t = clamp_seconds(self.player.current_time());
                let order = self.config.insert_order;
                let result = self
                    .store
                    .apply(|s| ops::add_note(s, &project_id, &video_id, t, &text, order));
                if self.report(result).is_some() {
                    self.notes_draft.text.clear();
                }
            }
            NotesAction::Save(note_id, text) => {
                let result = self
                    .store
                    .update(|s| ops::edit_note(s, &project_id, &video_id, &note_id, &text));
                if self.report(result).is_some() {
                    self.notes_draft.editing = None;
                }
            }
            NotesAction::Delete(note_id) => {
                let result = self
                    .store
                    .update(|s| ops::delete_note(s, &project_id, &video_id, &note_id));
                self.report(result);
            }
        }
    }

    fn handle_bookmarks(&mut self, action: bookmarks::BookmarksAction) {
        use bookmarks::BookmarksAction;

        let (Some(project_id), Some(video_id)) = (self.current_project_id(), self.open_video.clone())
        else {
            return;
        };

        match action {
            BookmarksAction::None => {}
            BookmarksAction::Seek(t) => {
                self.player.seek_to(t as f64);
                self.shown_time = self.player.current_time();
            }
            BookmarksAction::Add => {
                let draft = &self.bookmarks_draft;
                let bookmark = ops::NewBookmark {
                    t: clamp_seconds(self.player.current_time()),
                    title: Some(draft.title.as_str()),
                    tag: Some(draft.tag.as_str()),
                    color: Some(draft.color.as_str()),
                };
                let order = self.config.insert_order;
                let result = self
                    .store
                    .apply(|s| ops::add_bookmark(s, &project_id, &video_id, bookmark, order));
                if self.report(result).is_some() {
                    self.bookmarks_draft.title.clear();
                    self.bookmarks_draft.tag.clear();
                }
            }
            BookmarksAction::MoveToFront(bookmark_id) => {
                let result = self.store.update(|s| {
                    ops::move_bookmark_to_front(s, &project_id, &video_id, &bookmark_id)
                });
                self.report(result);
            }
            BookmarksAction::Delete(bookmark_id) => {
                let result = self
                    .store
                    .update(|s| ops::delete_bookmark(s, &project_id, &video_id, &bookmark_id));
                self.report(result);
            }
        }
    }

    // --- FILES ---

    /// Export the current project to a file chosen by the user.
    fn export_project(&mut self) {
        let Some(project) = self.store.state().current_project() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .add_filter("YAML", &["yaml", "yml"])
            .set_file_name(format!("{}.json", project.name))
            .save_file()
        else {
            return;
        };

        match serialization::export_project(project, &path) {
            Ok(()) => {
                log::info!("Exported project to {}", path.display());
                self.info(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export project: {:#}", e);
                self.error(format!("Export failed: {}", e));
            }
        }
    }

    /// Import a project file chosen by the user.
    fn import_project(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Projects", &["json", "yaml", "yml"])
            .pick_file()
        else {
            return;
        };

        match serialization::import_project(&path) {
            Ok(project) => {
                self.close_video();
                let id = self.store.apply(|s| Ok(ops::import_project(s, project)));
                if let Some(id) = self.report(id) {
                    log::info!("Imported project {} from {}", id, path.display());
                    self.info("Project imported");
                }
            }
            Err(e) => {
                log::error!("Failed to import project: {:#}", e);
                self.error(format!("Import failed: {}", e));
            }
        }
    }

    /// Export the open video's notes and bookmarks as a text outline.
    fn export_outline(&mut self) {
        self.flush_resume();
        let Some(video) = self.current_video() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Text", &["txt"])
            .set_file_name(format!("{}.txt", video.title))
            .save_file()
        else {
            return;
        };

        match outline::export_outline(video, self.config.outline_order, &path) {
            Ok(()) => {
                log::info!("Exported outline to {}", path.display());
                self.info(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export outline: {:#}", e);
                self.error(format!("Export failed: {}", e));
            }
        }
    }

    fn save_config(&mut self) {
        self.reminders
            .set_permission(Permission::from_setting(self.config.notifications_enabled));

        let Some(path) = Config::config_path() else {
            return;
        };
        if let Err(e) = self.config.save_to(&path) {
            log::error!("Failed to save config: {:#}", e);
            self.error("Could not save settings");
        }
    }
}

impl eframe::App for TubeNotesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.poll_expansion();
        self.run_timers(now);
        self.check_open_video();

        // Keep the clock display and background work moving
        if self.player.state() == PlayerState::Playing || self.expansion.is_some() {
            if let Some(remaining) = self.ticker.remaining(now) {
                ctx.request_repaint_after(remaining);
            }
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Import Project...").clicked() {
                        self.import_project();
                        ui.close_menu();
                    }
                    if ui.button("Export Project...").clicked() {
                        self.export_project();
                        ui.close_menu();
                    }
                    let has_video = self.open_video.is_some();
                    if ui
                        .add_enabled(has_video, egui::Button::new("Export Notes Outline..."))
                        .clicked()
                    {
                        self.export_outline();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Settings", |ui| {
                    let mut changed = false;
                    ui.label("New items go");
                    changed |= ui
                        .radio_value(&mut self.config.insert_order, InsertOrder::Front, "First")
                        .changed();
                    changed |= ui
                        .radio_value(&mut self.config.insert_order, InsertOrder::Back, "Last")
                        .changed();
                    ui.separator();
                    ui.label("Outline order");
                    changed |= ui
                        .radio_value(&mut self.config.outline_order, OutlineOrder::Stored, "As listed")
                        .changed();
                    changed |= ui
                        .radio_value(
                            &mut self.config.outline_order,
                            OutlineOrder::Chronological,
                            "By time",
                        )
                        .changed();
                    ui.separator();
                    changed |= ui
                        .checkbox(&mut self.config.playlist_aware, "Recognise playlist links")
                        .changed();
                    changed |= ui
                        .checkbox(&mut self.config.notifications_enabled, "Allow reminders")
                        .changed();
                    if changed {
                        self.save_config();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match &self.status {
                    Some(Status::Info(message)) => {
                        ui.label(message);
                    }
                    Some(Status::Error(message)) => {
                        ui.colored_label(egui::Color32::from_rgb(220, 90, 90), message);
                    }
                    None => {
                        ui.label(egui::RichText::new("Ready").weak());
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!("{} changes saved", self.revision.get()))
                            .weak(),
                    );
                    let pending = self.reminders.pending();
                    if pending > 0 {
                        ui.label(egui::RichText::new(format!("⏰ {}", pending)).weak());
                    }
                });
            });
        });

        // Sidebar
        let open_video = self.open_video.clone();
        let projects_action = egui::SidePanel::left("projects")
            .default_width(260.0)
            .show(ctx, |ui| {
                projects::show(
                    ui,
                    self.store.state(),
                    open_video.as_deref(),
                    &mut self.projects_draft,
                )
            })
            .inner;
        self.handle_projects(projects_action);

        // Space toggles playback unless a text field has focus
        if !ctx.wants_keyboard_input() && ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.player.toggle();
            self.shown_time = self.player.current_time();
        }

        // Main area
        let shown_time = self.shown_time;
        let player_state = self.player.state();
        let expanding = self.expansion.is_some();
        let mut transport_action = transport::TransportAction::None;
        let mut notes_action = notes::NotesAction::None;
        let mut bookmarks_action = bookmarks::BookmarksAction::None;

        egui::CentralPanel::default().show(ctx, |ui| {
            let video = self
                .store
                .state()
                .current_project()
                .and_then(|p| p.video(self.open_video.as_deref()?));

            let Some(video) = video else {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.heading(
                            egui::RichText::new("TubeNotes")
                                .size(32.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                        ui.label(
                            egui::RichText::new("Add or pick a video to start taking notes")
                                .color(egui::Color32::from_gray(180)),
                        );
                    });
                });
                return;
            };

            transport_action = transport::show(
                ui,
                video,
                shown_time,
                player_state,
                expanding,
                &mut self.transport_draft,
            );
            ui.separator();

            let now_secs = clamp_seconds(shown_time);
            ui.columns(2, |columns| {
                notes_action = notes::show(&mut columns[0], video, now_secs, &mut self.notes_draft);
                bookmarks_action =
                    bookmarks::show(&mut columns[1], video, now_secs, &mut self.bookmarks_draft);
            });
        });

        self.handle_transport(transport_action);
        self.handle_notes(notes_action);
        self.handle_bookmarks(bookmarks_action);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Saving resume position before exit");
        self.flush_resume();
        self.store.unsubscribe(self.subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::App as _;
    use tempfile::tempdir;

    #[test]
    fn test_exit_saves_resume_position() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config {
            data_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };

        let mut app = TubeNotesApp::new(config);
        app.add_video("dQw4w9WgXcQ");
        assert!(app.open_video.is_some());
        app.player.seek_to(42.0);
        app.on_exit(None);

        let store = DocumentStore::open(FileKeyValueStore::new(dir.path()));
        let project = store.state().current_project().unwrap();
        assert_eq!(project.videos.len(), 1);
        assert_eq!(project.videos[0].last_time, 42);
    }
}
