//! # Reminder Lifecycle
//!
//! [`ReminderController`] is the presentation-facing half of nudge. It keeps a
//! display copy of the reminders, filters and sorts it, creates reminders, and
//! runs the "mark done" flow.
//!
//! ## Mark Done and Undo
//!
//! ```text
//!  visible ──mark_done──▶ pending_delete ──grace period elapses (tick)──▶ deleted
//!     ▲                        │
//!     └──────────undo──────────┘
//! ```
//!
//! Marking a reminder done removes it from the view at once and arms a deferred
//! delete. The store is not touched until the delete fires, so an undo only has
//! to cancel the task and write the snapshot back with `done = false`.
//!
//! Only the most recent mark-done can be undone. Earlier pending deletes keep
//! their own tasks and still fire on schedule.
//!
//! Time only moves through the injected [`Clock`]; deferred deletes run when the
//! owner calls [`ReminderController::tick`].

use crate::error::{NudgeError, Result};
use crate::model::{Priority, Reminder};
use crate::notify::{NotificationRequest, Notifier, Permission};
use crate::schedule::{Clock, DeferredTasks, TaskHandle};
use crate::store::{KvBackend, ReminderStore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    All,
    Urgent,
    #[default]
    Sorted,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ViewMode::All),
            "urgent" | "urgent-only" => Ok(ViewMode::Urgent),
            "sorted" | "sort" => Ok(ViewMode::Sorted),
            other => Err(format!("unknown view mode: {}", other)),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewMode::All => "all",
            ViewMode::Urgent => "urgent",
            ViewMode::Sorted => "sorted",
        })
    }
}

/// How the sorted view orders priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most severe first.
    #[default]
    Severity,
    /// Priority labels compared as strings, descending.
    Label,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "severity" => Ok(SortKey::Severity),
            "label" => Ok(SortKey::Label),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Severity => "severity",
            SortKey::Label => "label",
        })
    }
}

/// Apply a view mode to a list of reminders. Sorting is stable.
pub fn arrange(reminders: &[Reminder], mode: ViewMode, sort_key: SortKey) -> Vec<Reminder> {
    let mut listed: Vec<Reminder> = reminders
        .iter()
        .filter(|r| mode != ViewMode::Urgent || r.priority.is_urgent())
        .cloned()
        .collect();

    if mode == ViewMode::Sorted {
        match sort_key {
            SortKey::Severity => {
                listed.sort_by(|a, b| b.priority.severity().cmp(&a.priority.severity()))
            }
            SortKey::Label => {
                listed.sort_by(|a, b| b.priority.as_str().cmp(a.priority.as_str()))
            }
        }
    }
    listed
}

#[derive(Debug, Clone)]
struct PendingDelete {
    reminder: Reminder,
    task: TaskHandle,
}

pub struct ReminderController<B: KvBackend, N: Notifier, C: Clock> {
    store: ReminderStore<B>,
    notifier: N,
    clock: C,
    grace_period: Duration,
    sort_key: SortKey,
    reminders: Vec<Reminder>,
    pending: HashMap<String, PendingDelete>,
    tasks: DeferredTasks,
    undo_target: Option<String>,
}

impl<B: KvBackend, N: Notifier, C: Clock> ReminderController<B, N, C> {
    pub fn new(store: ReminderStore<B>, notifier: N, clock: C) -> Self {
        Self {
            store,
            notifier,
            clock,
            grace_period: DEFAULT_GRACE_PERIOD,
            sort_key: SortKey::default(),
            reminders: Vec::new(),
            pending: HashMap::new(),
            tasks: DeferredTasks::new(),
            undo_target: None,
        }
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn with_sort_key(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    pub fn store(&self) -> &ReminderStore<B> {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// Refresh the display copy from the store. Reminders waiting on a
    /// deferred delete stay hidden.
    pub fn load(&mut self) {
        let pending = &self.pending;
        self.reminders = self
            .store
            .get_all()
            .into_iter()
            .filter(|r| !pending.contains_key(&r.id))
            .collect();
        debug!(count = self.reminders.len(), "Loaded reminders");
    }

    /// The display copy, unfiltered, in stored order.
    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn visible(&self, mode: ViewMode) -> Vec<Reminder> {
        arrange(&self.reminders, mode, self.sort_key)
    }

    /// Validate, schedule the repeating notification, and persist a new
    /// reminder.
    pub fn add(&mut self, text: &str, priority: Priority) -> Result<Reminder> {
        if text.trim().is_empty() {
            return Err(NudgeError::Validation(
                "Reminder text cannot be empty".to_string(),
            ));
        }

        if self.notifier.request_permission() != Permission::Granted {
            debug!("Notification permission denied, reminder not created");
            return Err(NudgeError::PermissionDenied);
        }

        let interval_secs = priority.interval_secs();
        debug!(%priority, interval_secs, "Scheduling repeating notification");
        let notification_id = match self
            .notifier
            .schedule_repeating(&NotificationRequest::repeating(text, interval_secs))
        {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Failed to schedule notification: {}", e);
                None
            }
        };

        let reminder = Reminder::new(text.to_string(), priority, notification_id);
        self.store.save(&reminder);
        debug!(id = %reminder.id, "Reminder saved");
        self.load();
        Ok(reminder)
    }

    /// Hide a reminder and arm its deferred delete. Returns `None` if the id is
    /// not in the current view.
    pub fn mark_done(&mut self, id: &str) -> Option<Reminder> {
        let position = self.reminders.iter().position(|r| r.id == id)?;
        let reminder = self.reminders.remove(position);

        let grace_ms = u64::try_from(self.grace_period.as_millis()).unwrap_or(u64::MAX);
        let due_at = self.clock.now_millis().saturating_add(grace_ms);
        let task = self.tasks.arm(id, due_at);
        self.pending.insert(
            id.to_string(),
            PendingDelete {
                reminder: reminder.clone(),
                task,
            },
        );
        self.undo_target = Some(id.to_string());
        debug!(id = %id, due_at, "Reminder pending delete");
        Some(reminder)
    }

    /// The reminder an undo would restore, if any.
    pub fn undo_target(&self) -> Option<&Reminder> {
        let id = self.undo_target.as_ref()?;
        self.pending.get(id).map(|p| &p.reminder)
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Time left until the next deferred delete is due.
    pub fn time_to_next_expiry(&self) -> Option<Duration> {
        let due_at = self.tasks.next_due()?;
        Some(Duration::from_millis(
            due_at.saturating_sub(self.clock.now_millis()),
        ))
    }

    /// Restore the most recently marked reminder. Has no effect once its
    /// delete has fired.
    pub fn undo(&mut self) -> Option<Reminder> {
        let id = self.undo_target.take()?;
        let pending = self.pending.remove(&id)?;
        self.tasks.cancel(pending.task);

        let mut restored = pending.reminder;
        restored.done = false;
        self.store.update(&restored);
        debug!(id = %id, "Reminder restored");
        self.load();
        Some(restored)
    }

    /// Hide the undo affordance. The pending delete keeps running.
    pub fn dismiss_undo(&mut self) {
        self.undo_target = None;
    }

    /// Run every deferred delete that is due. Returns the deleted reminders.
    pub fn tick(&mut self) -> Vec<Reminder> {
        let due = self.tasks.take_due(self.clock.now_millis());
        due.into_iter()
            .filter_map(|task| self.expire(&task.key))
            .collect()
    }

    /// Run every pending delete now, regardless of the grace period.
    pub fn flush(&mut self) -> Vec<Reminder> {
        let all = self.tasks.take_all();
        all.into_iter()
            .filter_map(|task| self.expire(&task.key))
            .collect()
    }

    /// Flip the stored `done` flag of a reminder.
    pub fn toggle(&mut self, id: &str) -> Option<Reminder> {
        let toggled = self.store.toggle_done(id);
        self.load();
        toggled
    }

    /// Remove every reminder, pending ones included, and their notifications.
    pub fn clear(&mut self) -> usize {
        self.tasks.take_all();
        self.pending.clear();
        self.undo_target = None;

        let all = self.store.get_all();
        for reminder in &all {
            self.cancel_notification(reminder);
        }
        self.store.clear_all();
        self.reminders.clear();
        all.len()
    }

    fn expire(&mut self, id: &str) -> Option<Reminder> {
        let pending = self.pending.remove(id)?;
        self.store.delete(id);
        self.cancel_notification(&pending.reminder);
        if self.undo_target.as_deref() == Some(id) {
            self.undo_target = None;
        }
        debug!(id = %id, "Reminder deleted");
        Some(pending.reminder)
    }

    fn cancel_notification(&self, reminder: &Reminder) {
        if let Some(handle) = &reminder.notification_id {
            if let Err(e) = self.notifier.cancel(handle) {
                warn!(id = %reminder.id, "Failed to cancel notification: {}", e);
            }
        }
    }
}
