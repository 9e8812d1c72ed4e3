// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timer-driven playback polling.
//!
//! The UI loop owns two `Interval`s: a short display ticker that only reads
//! the player, and a slower resume watcher that writes the playback
//! position into the document when it has drifted far enough. Both are
//! plain values owned by the app, so dropping the app cancels them.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A fixed-period timer polled from the UI loop.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next: Option<Instant>,
}

impl Interval {
    /// Start a timer whose first tick is one period after `now`.
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next: Some(now + period),
        }
    }

    /// Whether the timer fired since the last call. Missed ticks collapse
    /// into one.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if now >= next => {
                self.next = Some(now + self.period);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next tick, `None` once cancelled.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next.map(|next| next.saturating_duration_since(now))
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }
}

/// Decides when an observed playback position is worth persisting.
#[derive(Debug, Clone)]
pub struct ResumeWatcher {
    threshold: u32,
    persisted: HashMap<String, u32>,
}

impl ResumeWatcher {
    pub fn new(threshold_secs: u32) -> Self {
        Self {
            threshold: threshold_secs,
            persisted: HashMap::new(),
        }
    }

    /// Seed the last persisted value for a video (e.g. when it is opened).
    pub fn remember(&mut self, video_key: &str, seconds: u32) {
        self.persisted.insert(video_key.to_string(), seconds);
    }

    pub fn forget(&mut self, video_key: &str) {
        self.persisted.remove(video_key);
    }

    /// Report an observed position. Returns the value to persist when it
    /// differs from the last persisted one by more than the threshold.
    pub fn observe(&mut self, video_key: &str, seconds: f64) -> Option<u32> {
        if !seconds.is_finite() || seconds < 0.0 {
            return None;
        }
        let observed = crate::models::clamp_seconds(seconds);
        let last = self.persisted.get(video_key).copied().unwrap_or(0);

        if observed.abs_diff(last) <= self.threshold {
            log::debug!("Resume position {}s within threshold of {}s", observed, last);
            return None;
        }
        self.persisted.insert(video_key.to_string(), observed);
        Some(observed)
    }
}
