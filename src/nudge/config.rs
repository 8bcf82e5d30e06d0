//! # Configuration
//!
//! Stored as `config.json` in the data directory. Missing keys take their
//! defaults, so an absent or partial file is fine.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `grace-period-ms` | `5000` | Undo window after marking a reminder done |
//! | `view` | `sorted` | Default list view (`all`, `urgent`, `sorted`) |
//! | `sort-by` | `severity` | Sorted view order (`severity`, `label`) |
//! | `notifications` | `true` | Whether notification permission is granted |
//! | `namespace` | `reminders` | Storage key of the reminder collection |

use crate::error::{NudgeError, Result};
use crate::lifecycle::{SortKey, ViewMode, DEFAULT_GRACE_PERIOD};
use crate::notify::NOTIFICATIONS_KEY;
use crate::store::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";

/// Storage keys already taken by other files in the data directory.
const RESERVED_NAMESPACES: [&str; 2] = ["config", NOTIFICATIONS_KEY];

pub const KEYS: [&str; 5] = [
    "grace-period-ms",
    "view",
    "sort-by",
    "notifications",
    "namespace",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct NudgeConfig {
    pub grace_period_ms: u64,
    pub view: ViewMode,
    pub sort_by: SortKey,
    pub notifications: bool,
    pub namespace: String,
}

impl Default for NudgeConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: DEFAULT_GRACE_PERIOD.as_millis() as u64,
            view: ViewMode::default(),
            sort_by: SortKey::default(),
            notifications: true,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl NudgeConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&config_path).map_err(NudgeError::Io)?;
        let config = serde_json::from_str(&content).map_err(NudgeError::Serialization)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(NudgeError::Io)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(NudgeError::Serialization)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content).map_err(NudgeError::Io)?;
        Ok(())
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "grace-period-ms" => Some(self.grace_period_ms.to_string()),
            "view" => Some(self.view.to_string()),
            "sort-by" => Some(self.sort_by.to_string()),
            "notifications" => Some(self.notifications.to_string()),
            "namespace" => Some(self.namespace.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |e: String| NudgeError::Config(format!("{}: {}", key, e));
        match key {
            "grace-period-ms" => {
                self.grace_period_ms = value
                    .parse()
                    .map_err(|_| invalid(format!("not a number of milliseconds: {}", value)))?
            }
            "view" => self.view = value.parse().map_err(invalid)?,
            "sort-by" => self.sort_by = value.parse().map_err(invalid)?,
            "notifications" => {
                self.notifications = match value {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    other => return Err(invalid(format!("expected true or false, got {}", other))),
                }
            }
            "namespace" => {
                check_namespace(value).map_err(invalid)?;
                self.namespace = value.to_string()
            }
            other => return Err(NudgeError::Config(format!("Unknown config key: {}", other))),
        }
        Ok(())
    }
}

/// A namespace must be a plain file stem that doesn't shadow the config or
/// notification files.
pub fn check_namespace(value: &str) -> std::result::Result<(), String> {
    if value.is_empty()
        || !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(format!("invalid namespace: {:?}", value));
    }
    if RESERVED_NAMESPACES.contains(&value) {
        return Err(format!("namespace {:?} is reserved", value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NudgeConfig::default();
        assert_eq!(config.grace_period(), Duration::from_millis(5000));
        assert_eq!(config.view, ViewMode::Sorted);
        assert_eq!(config.sort_by, SortKey::Severity);
        assert!(config.notifications);
        assert_eq!(config.namespace, "reminders");
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = NudgeConfig::load(dir.path()).unwrap();
        assert_eq!(config, NudgeConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"view":"urgent"}"#).unwrap();
        let config = NudgeConfig::load(dir.path()).unwrap();
        assert_eq!(config.view, ViewMode::Urgent);
        assert_eq!(config.grace_period_ms, 5000);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = NudgeConfig::default();
        config.set("sort-by", "label").unwrap();
        config.set("grace-period-ms", "1500").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = NudgeConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.sort_by, SortKey::Label);
        assert_eq!(loaded.grace_period_ms, 1500);
    }

    #[test]
    fn test_get_every_key() {
        let config = NudgeConfig::default();
        for key in KEYS {
            assert!(config.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(config.get("nope"), None);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = NudgeConfig::default();
        assert!(config.set("grace-period-ms", "soon").is_err());
        assert!(config.set("view", "upside-down").is_err());
        assert!(config.set("notifications", "maybe").is_err());
        assert!(config.set("namespace", "../x").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert_eq!(config, NudgeConfig::default());
    }

    #[test]
    fn test_namespace_cannot_shadow_other_files() {
        let mut config = NudgeConfig::default();
        assert!(config.set("namespace", "config").is_err());
        assert!(config.set("namespace", NOTIFICATIONS_KEY).is_err());
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);

        config.set("namespace", "work").unwrap();
        assert_eq!(config.namespace, "work");
    }
}
