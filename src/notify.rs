// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Local reminders.
//!
//! Scheduling needs a permission grant. A missing platform capability and
//! a denied permission are reported as different errors so the UI can say
//! which one happened.

use crate::error::NotifyError;
use std::time::{Duration, Instant};

/// Permission to show reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// The platform cannot show reminders at all.
    Unsupported,
}

impl Permission {
    /// Permission implied by the user's setting. Builds without the
    /// `reminders` feature have no reminder support.
    pub fn from_setting(enabled: bool) -> Self {
        if !cfg!(feature = "reminders") {
            Permission::Unsupported
        } else if enabled {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }
}

/// Something that can schedule a local notification.
pub trait Notifier {
    fn schedule(&mut self, title: &str, body: &str, delay_minutes: u32) -> Result<(), NotifyError>;
}

/// A reminder waiting to fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub title: String,
    pub body: String,
    pub due: Instant,
}

/// In-app notifier: reminders are queued and handed back to the UI loop
/// when due.
#[derive(Debug, Clone)]
pub struct ReminderQueue {
    permission: Permission,
    pending: Vec<Reminder>,
}

impl ReminderQueue {
    pub fn new(permission: Permission) -> Self {
        Self {
            permission,
            pending: Vec::new(),
        }
    }

    pub fn set_permission(&mut self, permission: Permission) {
        self.permission = permission;
        if permission != Permission::Granted {
            self.pending.clear();
        }
    }

    pub fn schedule_at(
        &mut self,
        title: &str,
        body: &str,
        delay: Duration,
        now: Instant,
    ) -> Result<(), NotifyError> {
        match self.permission {
            Permission::Unsupported => return Err(NotifyError::Unsupported),
            Permission::Denied => return Err(NotifyError::PermissionDenied),
            Permission::Granted => {}
        }

        self.pending.push(Reminder {
            title: title.to_string(),
            body: body.to_string(),
            due: now + delay,
        });
        log::info!("Reminder '{}' scheduled in {:?}", title, delay);
        Ok(())
    }

    /// Remove and return every reminder due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<Reminder> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|r| r.due <= now);
        self.pending = pending;
        due.sort_by_key(|r| r.due);
        due
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Notifier for ReminderQueue {
    fn schedule(&mut self, title: &str, body: &str, delay_minutes: u32) -> Result<(), NotifyError> {
        let delay = Duration::from_secs(u64::from(delay_minutes) * 60);
        self.schedule_at(title, body, delay, Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_and_unsupported_are_distinct() {
        let mut denied = ReminderQueue::new(Permission::Denied);
        assert_eq!(denied.schedule("t", "b", 5), Err(NotifyError::PermissionDenied));

        let mut unsupported = ReminderQueue::new(Permission::Unsupported);
        assert_eq!(unsupported.schedule("t", "b", 5), Err(NotifyError::Unsupported));
        assert_eq!(unsupported.pending(), 0);
    }

    #[test]
    fn test_permission_follows_setting() {
        if cfg!(feature = "reminders") {
            assert_eq!(Permission::from_setting(true), Permission::Granted);
            assert_eq!(Permission::from_setting(false), Permission::Denied);
        } else {
            assert_eq!(Permission::from_setting(true), Permission::Unsupported);
        }
    }

    #[test]
    fn test_due_reminders_are_drained_in_order() {
        let now = Instant::now();
        let mut queue = ReminderQueue::new(Permission::Granted);
        queue.schedule_at("late", "", Duration::from_secs(120), now).unwrap();
        queue.schedule_at("early", "", Duration::from_secs(60), now).unwrap();
        queue.schedule_at("later", "", Duration::from_secs(600), now).unwrap();

        assert!(queue.take_due(now).is_empty());

        let due = queue.take_due(now + Duration::from_secs(300));
        let titles: Vec<&str> = due.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["early", "late"]);
        assert_eq!(queue.pending(), 1);
    }

    #[test]
    fn test_revoking_permission_drops_pending() {
        let mut queue = ReminderQueue::new(Permission::Granted);
        queue.schedule("t", "b", 1).unwrap();
        queue.set_permission(Permission::Denied);
        assert_eq!(queue.pending(), 0);
    }
}
