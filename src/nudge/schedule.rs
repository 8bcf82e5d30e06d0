//! # Deferred Tasks
//!
//! Single-shot tasks keyed by a string (a reminder id), due at a point on a
//! [`Clock`]. Nothing runs in the background: the owner asks for due tasks with
//! [`DeferredTasks::take_due`] and acts on them. Swapping the clock for a
//! [`ManualClock`] makes expiry and cancellation testable without waiting.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic milliseconds.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

/// Wall clock, counted from construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get().saturating_add(by.as_millis() as u64));
    }

    pub fn set(&self, millis: u64) {
        self.now.set(millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueTask {
    pub handle: TaskHandle,
    pub key: String,
    pub due_at: u64,
}

#[derive(Debug, Default)]
pub struct DeferredTasks {
    next_handle: u64,
    armed: Vec<DueTask>,
}

impl DeferredTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, key: impl Into<String>, due_at: u64) -> TaskHandle {
        self.next_handle += 1;
        let handle = TaskHandle(self.next_handle);
        self.armed.push(DueTask {
            handle,
            key: key.into(),
            due_at,
        });
        handle
    }

    /// Returns false if the task already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.armed.len();
        self.armed.retain(|t| t.handle != handle);
        self.armed.len() != before
    }

    /// Remove and return every task due at or before `now`, earliest first.
    pub fn take_due(&mut self, now: u64) -> Vec<DueTask> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.armed.drain(..).partition(|t| t.due_at <= now);
        self.armed = pending;
        due.sort_by_key(|t| (t.due_at, t.handle.0));
        due
    }

    /// Remove and return every armed task regardless of due time.
    pub fn take_all(&mut self) -> Vec<DueTask> {
        self.take_due(u64::MAX)
    }

    pub fn next_due(&self) -> Option<u64> {
        self.armed.iter().map(|t| t.due_at).min()
    }

    pub fn len(&self) -> usize {
        self.armed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.armed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_is_due_before_its_time() {
        let mut tasks = DeferredTasks::new();
        tasks.arm("a", 5000);
        assert!(tasks.take_due(4999).is_empty());
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn due_tasks_fire_once_in_order() {
        let mut tasks = DeferredTasks::new();
        tasks.arm("late", 7000);
        tasks.arm("early", 5000);
        tasks.arm("later", 9000);

        let due: Vec<_> = tasks.take_due(8000).into_iter().map(|t| t.key).collect();
        assert_eq!(due, vec!["early", "late"]);
        assert!(tasks.take_due(8000).is_empty());
        assert_eq!(tasks.next_due(), Some(9000));
    }

    #[test]
    fn cancel_only_before_firing() {
        let mut tasks = DeferredTasks::new();
        let a = tasks.arm("a", 100);
        let b = tasks.arm("b", 100);

        assert!(tasks.cancel(a));
        assert!(!tasks.cancel(a));

        assert_eq!(tasks.take_due(100).len(), 1);
        assert!(!tasks.cancel(b));
        assert!(tasks.is_empty());
    }

    #[test]
    fn take_all_ignores_due_time() {
        let mut tasks = DeferredTasks::new();
        tasks.arm("a", 1_000_000);
        assert_eq!(tasks.take_all().len(), 1);
        assert_eq!(tasks.next_due(), None);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let view = clock.clone();
        clock.advance(Duration::from_millis(2000));
        assert_eq!(view.now_millis(), 2000);
        view.set(10);
        assert_eq!(clock.now_millis(), 10);
    }
}
