//! # Storage Layer
//!
//! Reminders live in a single serialized collection (a JSON array) stored under
//! one namespaced key of a [`KvBackend`].
//!
//! ## Read-Modify-Write
//!
//! Every mutating operation reads the whole collection, applies its change and
//! rewrites the whole collection. There is no partial update and no isolation:
//! two processes writing the same key can lose an update (last full write wins).
//!
//! ## Failure Model
//!
//! [`ReminderStore`] never propagates persistence errors. A failure is logged
//! and a safe default is returned instead (empty list, no-op, `None`). Callers
//! that need to know use the backend directly.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one `<key>.json` file per key, atomic writes.
//! - [`mem_backend::MemBackend`]: in-memory, with read/write failure injection.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── reminders.json      # The reminder collection (namespace key)
//! ├── notifications.json  # Repeating notification schedules
//! └── config.json         # Configuration
//! ```

use crate::error::Result;
use crate::model::Reminder;
use tracing::error;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::KvBackend;

pub const DEFAULT_NAMESPACE: &str = "reminders";

pub struct ReminderStore<B: KvBackend> {
    backend: B,
    namespace: String,
}

impl<B: KvBackend> ReminderStore<B> {
    pub fn new(backend: B, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The full collection in stored order. Empty if nothing is stored or the
    /// stored blob cannot be read.
    pub fn get_all(&self) -> Vec<Reminder> {
        match self.load() {
            Ok(reminders) => reminders,
            Err(e) => {
                error!(namespace = %self.namespace, "Failed to load reminders: {}", e);
                Vec::new()
            }
        }
    }

    /// Append a reminder. Ids are not checked for uniqueness.
    pub fn save(&self, reminder: &Reminder) {
        let mut reminders = self.get_all();
        reminders.push(reminder.clone());
        if let Err(e) = self.persist(&reminders) {
            error!(id = %reminder.id, "Failed to save reminder: {}", e);
        }
    }

    /// Replace the reminder with the same id. The collection is rewritten even
    /// when no reminder matches.
    pub fn update(&self, updated: &Reminder) {
        let reminders: Vec<Reminder> = self
            .get_all()
            .into_iter()
            .map(|r| if r.id == updated.id { updated.clone() } else { r })
            .collect();
        if let Err(e) = self.persist(&reminders) {
            error!(id = %updated.id, "Failed to update reminder: {}", e);
        }
    }

    pub fn delete(&self, id: &str) {
        let mut reminders = self.get_all();
        reminders.retain(|r| r.id != id);
        if let Err(e) = self.persist(&reminders) {
            error!(id = %id, "Failed to delete reminder: {}", e);
        }
    }

    /// Flip `done` on the matching reminder and return it.
    pub fn toggle_done(&self, id: &str) -> Option<Reminder> {
        let mut reminders = self.get_all();
        let mut changed = None;
        for r in reminders.iter_mut().filter(|r| r.id == id) {
            r.done = !r.done;
            changed.get_or_insert_with(|| r.clone());
        }
        match self.persist(&reminders) {
            Ok(()) => changed,
            Err(e) => {
                error!(id = %id, "Failed to toggle reminder: {}", e);
                None
            }
        }
    }

    pub fn clear_all(&self) {
        if let Err(e) = self.backend.remove_item(&self.namespace) {
            error!(namespace = %self.namespace, "Failed to clear reminders: {}", e);
        }
    }

    fn load(&self) -> Result<Vec<Reminder>> {
        match self.backend.get_item(&self.namespace)? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&self, reminders: &[Reminder]) -> Result<()> {
        let content = serde_json::to_string(reminders)?;
        self.backend.set_item(&self.namespace, &content)
    }
}
