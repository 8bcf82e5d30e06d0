//! # API Facade
//!
//! A thin facade over [`ReminderController`] and the configuration. It is the
//! single entry point for UI clients.
//!
//! The facade:
//! - **Resolves selectors** (display positions, ids, id prefixes) against the
//!   view the user was shown
//! - **Dispatches** to the controller
//! - **Returns structured types** (`CmdResult`) instead of strings
//!
//! It does no I/O of its own beyond what the store and config do, and never
//! writes to stdout or stderr.

use crate::config::{check_namespace, NudgeConfig};
use crate::error::Result;
use crate::index::{resolve, Selector};
use crate::lifecycle::{ReminderController, ViewMode};
use crate::model::{Priority, Reminder};
use crate::notify::{KvNotifier, Notifier};
use crate::schedule::{Clock, SystemClock};
use crate::store::fs_backend::FsBackend;
use crate::store::{KvBackend, ReminderStore, DEFAULT_NAMESPACE};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected: Vec<Reminder>,
    pub listed: Vec<Reminder>,
    pub config: Option<NudgeConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, reminders: Vec<Reminder>) -> Self {
        self.affected = reminders;
        self
    }

    pub fn with_listed(mut self, reminders: Vec<Reminder>) -> Self {
        self.listed = reminders;
        self
    }

    pub fn with_config(mut self, config: NudgeConfig) -> Self {
        self.config = Some(config);
        self
    }
}

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub type FsApi = NudgeApi<FsBackend, KvNotifier<FsBackend>, SystemClock>;

pub struct NudgeApi<B: KvBackend, N: Notifier, C: Clock> {
    controller: ReminderController<B, N, C>,
    config: NudgeConfig,
    data_dir: PathBuf,
}

impl FsApi {
    /// Open the reminders kept in `data_dir`, honoring its `config.json`.
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        let mut config = NudgeConfig::load(&data_dir)?;
        if let Err(e) = check_namespace(&config.namespace) {
            warn!("Ignoring configured namespace, {}", e);
            config.namespace = DEFAULT_NAMESPACE.to_string();
        }
        let store = ReminderStore::new(FsBackend::new(data_dir.clone()), config.namespace.clone());
        let notifier = KvNotifier::new(FsBackend::new(data_dir.clone()), config.notifications);
        let controller = ReminderController::new(store, notifier, SystemClock::new());
        Ok(Self::new(controller, config, data_dir))
    }
}

impl<B: KvBackend, N: Notifier, C: Clock> NudgeApi<B, N, C> {
    pub fn new(
        controller: ReminderController<B, N, C>,
        config: NudgeConfig,
        data_dir: PathBuf,
    ) -> Self {
        let mut controller = controller
            .with_grace_period(config.grace_period())
            .with_sort_key(config.sort_by);
        controller.load();
        Self {
            controller,
            config,
            data_dir,
        }
    }

    pub fn controller(&self) -> &ReminderController<B, N, C> {
        &self.controller
    }

    pub fn config(&self) -> &NudgeConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn default_view(&self) -> ViewMode {
        self.config.view
    }

    pub fn list(&mut self, mode: ViewMode) -> CmdResult {
        self.controller.load();
        CmdResult::default().with_listed(self.controller.visible(mode))
    }

    pub fn add(&mut self, text: &str, priority: Priority) -> Result<CmdResult> {
        let reminder = self.controller.add(text, priority)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Reminder added ({}): {}",
            reminder.priority, reminder.text
        )));
        if reminder.notification_id.is_none() {
            result.add_message(CmdMessage::warning(
                "Could not schedule a notification for this reminder",
            ));
        }
        Ok(result.with_affected(vec![reminder]))
    }

    /// Mark the selected reminder done. Its delete is deferred by the grace
    /// period; see [`Self::undo`] and [`Self::settle`].
    pub fn mark_done(&mut self, selector: &Selector, mode: ViewMode) -> Result<CmdResult> {
        let view = self.controller.visible(mode);
        let id = resolve(&view, selector)?.id.clone();
        let mut result = CmdResult::default();
        if let Some(reminder) = self.controller.mark_done(&id) {
            result.add_message(CmdMessage::success(format!(
                "Reminder completed: {}",
                reminder.text
            )));
            result.affected.push(reminder);
        }
        Ok(result)
    }

    pub fn undo(&mut self) -> CmdResult {
        let mut result = CmdResult::default();
        match self.controller.undo() {
            Some(reminder) => {
                result.add_message(CmdMessage::success(format!(
                    "Reminder restored: {}",
                    reminder.text
                )));
                result.affected.push(reminder);
            }
            None => result.add_message(CmdMessage::info("Nothing to undo.")),
        }
        result
    }

    pub fn time_to_next_expiry(&self) -> Option<Duration> {
        self.controller.time_to_next_expiry()
    }

    /// Run deferred deletes that are due.
    pub fn settle(&mut self) -> CmdResult {
        let deleted = self.controller.tick();
        deleted_result(deleted)
    }

    /// Run every deferred delete now.
    pub fn flush(&mut self) -> CmdResult {
        let deleted = self.controller.flush();
        deleted_result(deleted)
    }

    pub fn toggle(&mut self, selector: &Selector, mode: ViewMode) -> Result<CmdResult> {
        let view = self.controller.visible(mode);
        let id = resolve(&view, selector)?.id.clone();
        let mut result = CmdResult::default();
        match self.controller.toggle(&id) {
            Some(reminder) => {
                let state = if reminder.done { "done" } else { "not done" };
                result.add_message(CmdMessage::success(format!(
                    "Marked {}: {}",
                    state, reminder.text
                )));
                result.affected.push(reminder);
            }
            None => result.add_message(CmdMessage::error("Could not update reminder.")),
        }
        Ok(result)
    }

    pub fn clear(&mut self) -> CmdResult {
        let removed = self.controller.clear();
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Removed {} reminder{}.",
            removed,
            if removed == 1 { "" } else { "s" }
        )));
        result
    }

    pub fn interval(&self, priority: Priority) -> CmdResult {
        let secs = priority.interval_secs();
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info(format!(
            "{}: every {} seconds ({} hours)",
            priority,
            secs,
            secs / 3600
        )));
        result
    }

    /// Show or change configuration. Changes are saved to the data directory
    /// and take effect on the next run.
    pub fn configure(&mut self, action: ConfigAction) -> Result<CmdResult> {
        match action {
            ConfigAction::ShowAll => Ok(CmdResult::default().with_config(self.config.clone())),
            ConfigAction::ShowKey(key) => {
                let mut result = CmdResult::default();
                match self.config.get(&key) {
                    Some(val) => result.add_message(CmdMessage::info(val)),
                    None => {
                        result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                    }
                }
                Ok(result)
            }
            ConfigAction::Set(key, value) => {
                let mut config = self.config.clone();
                if let Err(e) = config.set(&key, &value) {
                    let mut result = CmdResult::default();
                    result.add_message(CmdMessage::error(e.to_string()));
                    return Ok(result);
                }
                config.save(&self.data_dir)?;
                let display_val = config.get(&key).unwrap_or(value);
                self.config = config.clone();
                let mut result = CmdResult::default().with_config(config);
                result.add_message(CmdMessage::success(format!(
                    "{} set to {}",
                    key, display_val
                )));
                Ok(result)
            }
        }
    }
}

fn deleted_result(deleted: Vec<Reminder>) -> CmdResult {
    let mut result = CmdResult::default();
    for reminder in &deleted {
        result.add_message(CmdMessage::info(format!(
            "Reminder deleted: {}",
            reminder.text
        )));
    }
    result.with_affected(deleted)
}
