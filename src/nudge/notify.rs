//! # Host Notifications
//!
//! The lifecycle never fires notifications itself. It asks a [`Notifier`] for
//! permission and hands it a repeating schedule; the host does the rest.
//!
//! - [`KvNotifier`]: records schedules as JSON under the `notifications` key of
//!   a [`KvBackend`], for a host agent to pick up. Permission is a config flag.
//! - [`MemNotifier`]: in-memory, for tests. Can deny permission or fail.

use crate::error::{NudgeError, Result};
use crate::store::KvBackend;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use uuid::Uuid;

pub const NOTIFICATIONS_KEY: &str = "notifications";
pub const NOTIFICATION_TITLE: &str = "Reminder";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub interval_secs: u64,
}

impl NotificationRequest {
    pub fn repeating(body: impl Into<String>, interval_secs: u64) -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            body: body.into(),
            interval_secs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNotification {
    pub handle: String,
    pub title: String,
    pub body: String,
    pub interval_secs: u64,
    pub scheduled_at: i64,
}

pub trait Notifier {
    fn request_permission(&self) -> Permission;

    /// Schedule a notification that repeats every `interval_secs`. Returns the
    /// host's handle for it.
    fn schedule_repeating(&self, request: &NotificationRequest) -> Result<String>;

    fn cancel(&self, handle: &str) -> Result<()>;
}

pub struct KvNotifier<B: KvBackend> {
    backend: B,
    enabled: bool,
}

impl<B: KvBackend> KvNotifier<B> {
    pub fn new(backend: B, enabled: bool) -> Self {
        Self { backend, enabled }
    }

    pub fn scheduled(&self) -> Result<Vec<ScheduledNotification>> {
        match self.backend.get_item(NOTIFICATIONS_KEY)? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, entries: &[ScheduledNotification]) -> Result<()> {
        let content = serde_json::to_string_pretty(entries)?;
        self.backend.set_item(NOTIFICATIONS_KEY, &content)
    }
}

impl<B: KvBackend> Notifier for KvNotifier<B> {
    fn request_permission(&self) -> Permission {
        if self.enabled {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    fn schedule_repeating(&self, request: &NotificationRequest) -> Result<String> {
        if request.interval_secs == 0 {
            return Err(NudgeError::Notification(
                "interval must be positive".to_string(),
            ));
        }
        let mut entries = self.scheduled()?;
        let entry = ScheduledNotification {
            handle: Uuid::new_v4().to_string(),
            title: request.title.clone(),
            body: request.body.clone(),
            interval_secs: request.interval_secs,
            scheduled_at: Utc::now().timestamp_millis(),
        };
        let handle = entry.handle.clone();
        entries.push(entry);
        self.write(&entries)?;
        Ok(handle)
    }

    fn cancel(&self, handle: &str) -> Result<()> {
        let mut entries = self.scheduled()?;
        entries.retain(|e| e.handle != handle);
        self.write(&entries)
    }
}

/// In-memory notifier for tests.
#[derive(Default)]
pub struct MemNotifier {
    deny: RefCell<bool>,
    fail: RefCell<bool>,
    next: RefCell<u32>,
    active: RefCell<Vec<(String, NotificationRequest)>>,
    cancelled: RefCell<Vec<String>>,
}

impl MemNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_deny_permission(&self, deny: bool) {
        *self.deny.borrow_mut() = deny;
    }

    pub fn set_fail_scheduling(&self, fail: bool) {
        *self.fail.borrow_mut() = fail;
    }

    pub fn active(&self) -> Vec<(String, NotificationRequest)> {
        self.active.borrow().clone()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.cancelled.borrow().clone()
    }
}

impl Notifier for MemNotifier {
    fn request_permission(&self) -> Permission {
        if *self.deny.borrow() {
            Permission::Denied
        } else {
            Permission::Granted
        }
    }

    fn schedule_repeating(&self, request: &NotificationRequest) -> Result<String> {
        if *self.fail.borrow() {
            return Err(NudgeError::Notification(
                "Simulated scheduling failure".to_string(),
            ));
        }
        let mut next = self.next.borrow_mut();
        *next += 1;
        let handle = format!("notification-{}", *next);
        self.active
            .borrow_mut()
            .push((handle.clone(), request.clone()));
        Ok(handle)
    }

    fn cancel(&self, handle: &str) -> Result<()> {
        self.active.borrow_mut().retain(|(h, _)| h != handle);
        self.cancelled.borrow_mut().push(handle.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn kv_notifier_records_and_cancels_schedules() {
        let notifier = KvNotifier::new(MemBackend::new(), true);
        let first = notifier
            .schedule_repeating(&NotificationRequest::repeating("Buy milk", 43200))
            .unwrap();
        let second = notifier
            .schedule_repeating(&NotificationRequest::repeating("Call mom", 3600))
            .unwrap();

        let scheduled = notifier.scheduled().unwrap();
        assert_eq!(scheduled.len(), 2);
        assert_eq!(scheduled[0].title, "Reminder");
        assert_eq!(scheduled[0].body, "Buy milk");
        assert_eq!(scheduled[0].interval_secs, 43200);

        notifier.cancel(&first).unwrap();
        let remaining: Vec<_> = notifier
            .scheduled()
            .unwrap()
            .into_iter()
            .map(|s| s.handle)
            .collect();
        assert_eq!(remaining, vec![second]);
    }

    #[test]
    fn kv_notifier_permission_follows_flag() {
        assert_eq!(
            KvNotifier::new(MemBackend::new(), false).request_permission(),
            Permission::Denied
        );
        assert_eq!(
            KvNotifier::new(MemBackend::new(), true).request_permission(),
            Permission::Granted
        );
    }

    #[test]
    fn kv_notifier_surfaces_backend_failure() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        let notifier = KvNotifier::new(backend, true);
        assert!(notifier
            .schedule_repeating(&NotificationRequest::repeating("x", 3600))
            .is_err());
    }

    #[test]
    fn mem_notifier_tracks_active_and_cancelled() {
        let notifier = MemNotifier::new();
        let handle = notifier
            .schedule_repeating(&NotificationRequest::repeating("x", 3600))
            .unwrap();
        assert_eq!(notifier.active().len(), 1);
        notifier.cancel(&handle).unwrap();
        assert!(notifier.active().is_empty());
        assert_eq!(notifier.cancelled(), vec![handle]);
    }
}
