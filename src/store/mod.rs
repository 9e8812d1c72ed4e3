// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Document store.
//!
//! `DocumentStore` owns the current `AppState` and its load/save lifecycle.
//! Changes are expressed as pure functions from `ops`; the store commits a
//! successful result, persists it and tells subscribers. Subscribers never
//! get a handle back into the store, so presentation code observes state
//! without the store knowing how it is rendered.

pub mod ops;

use crate::error::StoreError;
use crate::io::storage::KeyValueStore;
use crate::models::AppState;
use serde::{Deserialize, Serialize};

/// Key the document is persisted under.
pub const STATE_KEY: &str = "tubenotes.state";

/// Where new videos, notes and bookmarks are placed in their collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertOrder {
    /// Most recent first.
    #[default]
    Front,
    Back,
}

/// Handle returned by `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&AppState)>;

/// Owner of the application document.
pub struct DocumentStore<B: KeyValueStore> {
    state: AppState,
    backend: B,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<B: KeyValueStore> DocumentStore<B> {
    /// Load the document from `backend`. A missing, unreadable or corrupt
    /// record yields a fresh default document; nothing is written until the
    /// first change.
    pub fn open(backend: B) -> Self {
        let state = load_state(&backend);
        Self {
            state,
            backend,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run a pure transformation against the current state and commit its
    /// result. On error the current state is kept and the error returned.
    pub fn apply<T, F>(&mut self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&AppState) -> Result<(AppState, T), StoreError>,
    {
        let (next, out) = op(&self.state)?;
        self.commit(next);
        Ok(out)
    }

    /// Like `apply` for operations that only return the new state.
    pub fn update<F>(&mut self, op: F) -> Result<(), StoreError>
    where
        F: FnOnce(&AppState) -> Result<AppState, StoreError>,
    {
        self.apply(|state| op(state).map(|next| (next, ())))
    }

    /// Replace the current state. Structurally equal states are not
    /// persisted or announced again.
    pub fn commit(&mut self, next: AppState) {
        if next == self.state {
            log::debug!("State unchanged, skipping save");
            return;
        }
        self.state = next;
        self.save();
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
    }

    /// Register a listener called after every committed change.
    pub fn subscribe(&mut self, listener: impl FnMut(&AppState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(sub, _)| *sub != id);
    }

    /// Persist the current state. Failures are logged, never raised: the
    /// in-memory document stays authoritative.
    fn save(&mut self) {
        let json = match serde_json::to_string(&self.state) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize state: {}", e);
                return;
            }
        };
        if let Err(e) = self.backend.set(STATE_KEY, &json) {
            log::error!("Failed to save state: {:#}", e);
        }
    }
}

/// Read and repair the persisted document, falling back to a default one.
fn load_state(backend: &impl KeyValueStore) -> AppState {
    let raw = match backend.get(STATE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            log::info!("No saved state, starting fresh");
            return AppState::default();
        }
        Err(e) => {
            log::warn!("Failed to read saved state, starting fresh: {:#}", e);
            return AppState::default();
        }
    };

    match serde_json::from_str::<AppState>(&raw) {
        Ok(state) => {
            let state = ops::normalize(state);
            log::info!("Loaded {} project(s)", state.projects.len());
            state
        }
        Err(e) => {
            log::warn!("Saved state is corrupt, starting fresh: {}", e);
            AppState::default()
        }
    }
}
