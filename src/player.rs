// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback boundary.
//!
//! The rest of the application only needs five things from a video player:
//! current time, seek, play, pause and state. `PlayerHandle` guards every
//! call so nothing fails before a player is attached.

use std::time::Instant;

/// Coarse player state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayerState {
    #[default]
    Unstarted,
    Ready,
    Playing,
    Paused,
}

/// Capabilities required from a video player.
pub trait Player {
    /// Playback position in seconds.
    fn current_time(&self) -> f64;
    fn seek_to(&mut self, seconds: f64);
    fn play(&mut self);
    fn pause(&mut self);
    fn state(&self) -> PlayerState;
}

/// Optional player with safe defaults: reads return zero / `Unstarted` and
/// writes are dropped until `attach` is called.
#[derive(Default)]
pub struct PlayerHandle {
    inner: Option<Box<dyn Player>>,
}

impl PlayerHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, player: Box<dyn Player>) {
        self.inner = Some(player);
    }

    pub fn detach(&mut self) {
        self.inner = None;
    }

    pub fn is_attached(&self) -> bool {
        self.inner.is_some()
    }

    pub fn current_time(&self) -> f64 {
        self.inner
            .as_ref()
            .map(|p| p.current_time())
            .filter(|t| t.is_finite() && *t >= 0.0)
            .unwrap_or(0.0)
    }

    pub fn seek_to(&mut self, seconds: f64) {
        if let Some(player) = self.inner.as_mut() {
            player.seek_to(seconds.max(0.0));
        }
    }

    pub fn play(&mut self) {
        if let Some(player) = self.inner.as_mut() {
            player.play();
        }
    }

    pub fn pause(&mut self) {
        if let Some(player) = self.inner.as_mut() {
            player.pause();
        }
    }

    pub fn state(&self) -> PlayerState {
        self.inner
            .as_ref()
            .map(|p| p.state())
            .unwrap_or_default()
    }

    pub fn toggle(&mut self) {
        match self.state() {
            PlayerState::Playing => self.pause(),
            _ => self.play(),
        }
    }
}

/// A playback clock. The desktop app opens the real video in the browser
/// and follows along with this clock, which advances in wall time while
/// playing.
#[derive(Debug, Clone)]
pub struct ClockPlayer {
    state: PlayerState,
    /// Position at `anchor`.
    position: f64,
    anchor: Instant,
}

impl ClockPlayer {
    /// A ready clock parked at `start` seconds.
    pub fn new(start: f64) -> Self {
        Self {
            state: PlayerState::Ready,
            position: start.max(0.0),
            anchor: Instant::now(),
        }
    }

    pub fn time_at(&self, now: Instant) -> f64 {
        match self.state {
            PlayerState::Playing => {
                self.position + now.saturating_duration_since(self.anchor).as_secs_f64()
            }
            _ => self.position,
        }
    }

    fn rebase(&mut self, now: Instant) {
        self.position = self.time_at(now);
        self.anchor = now;
    }
}

impl Player for ClockPlayer {
    fn current_time(&self) -> f64 {
        self.time_at(Instant::now())
    }

    fn seek_to(&mut self, seconds: f64) {
        self.position = seconds.max(0.0);
        self.anchor = Instant::now();
    }

    fn play(&mut self) {
        if self.state != PlayerState::Playing {
            self.rebase(Instant::now());
            self.state = PlayerState::Playing;
        }
    }

    fn pause(&mut self) {
        if self.state == PlayerState::Playing {
            self.rebase(Instant::now());
            self.state = PlayerState::Paused;
        }
    }

    fn state(&self) -> PlayerState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_unattached_handle_is_inert() {
        let mut handle = PlayerHandle::new();
        handle.play();
        handle.seek_to(30.0);
        assert_eq!(handle.current_time(), 0.0);
        assert_eq!(handle.state(), PlayerState::Unstarted);
        assert!(!handle.is_attached());
    }

    #[test]
    fn test_attached_handle_forwards() {
        let mut handle = PlayerHandle::new();
        handle.attach(Box::new(ClockPlayer::new(12.0)));
        assert_eq!(handle.state(), PlayerState::Ready);
        assert_eq!(handle.current_time(), 12.0);

        handle.seek_to(-4.0);
        assert_eq!(handle.current_time(), 0.0);

        handle.toggle();
        assert_eq!(handle.state(), PlayerState::Playing);
        handle.toggle();
        assert_eq!(handle.state(), PlayerState::Paused);

        handle.detach();
        assert_eq!(handle.state(), PlayerState::Unstarted);
    }

    #[test]
    fn test_clock_advances_only_while_playing() {
        let mut clock = ClockPlayer::new(10.0);
        let start = clock.anchor;
        assert_eq!(clock.time_at(start + Duration::from_secs(5)), 10.0);

        clock.state = PlayerState::Playing;
        assert_eq!(clock.time_at(start + Duration::from_secs(5)), 15.0);

        clock.rebase(start + Duration::from_secs(5));
        clock.state = PlayerState::Paused;
        assert_eq!(clock.time_at(start + Duration::from_secs(60)), 15.0);
    }
}
