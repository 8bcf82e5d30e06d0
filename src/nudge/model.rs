use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const HOUR_SECS: u64 = 60 * 60;

/// How pressing a reminder is. Determines how often its notification repeats.
///
/// Serialized as `normal`, `urgent` and `very_urgent`. Any other stored label
/// reads back as [`Priority::Normal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Priority {
    #[default]
    Normal,
    Urgent,
    VeryUrgent,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Normal, Priority::Urgent, Priority::VeryUrgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Urgent => "urgent",
            Priority::VeryUrgent => "very_urgent",
        }
    }

    /// Seconds between repeats of the reminder's notification.
    pub fn interval_secs(&self) -> u64 {
        match self {
            Priority::VeryUrgent => HOUR_SECS,
            Priority::Urgent => 12 * HOUR_SECS,
            Priority::Normal => 48 * HOUR_SECS,
        }
    }

    /// Higher is more pressing.
    pub fn severity(&self) -> u8 {
        match self {
            Priority::Normal => 0,
            Priority::Urgent => 1,
            Priority::VeryUrgent => 2,
        }
    }

    pub fn is_urgent(&self) -> bool {
        matches!(self, Priority::Urgent | Priority::VeryUrgent)
    }

    /// Exact stored label. Case and separators must match.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == label)
    }
}

impl From<String> for Priority {
    fn from(label: String) -> Self {
        Self::from_label(&label).unwrap_or_default()
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::from_label(&normalized).ok_or_else(|| format!("unknown priority: {}", s.trim()))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interval for a raw priority label. Unrecognized labels get the normal cadence.
pub fn interval_for_label(label: &str) -> u64 {
    Priority::from(label.to_string()).interval_secs()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub text: String,
    pub priority: Priority,
    /// Epoch milliseconds.
    pub created_at: i64,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<String>,
}

impl Reminder {
    pub fn new(text: String, priority: Priority, notification_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text,
            priority,
            created_at: Utc::now().timestamp_millis(),
            done: false,
            notification_id,
        }
    }

    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }
}
