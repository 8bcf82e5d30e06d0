use crate::error::Result;

/// Raw key-value persistence.
///
/// Values are opaque strings (serialized JSON in practice). This trait covers
/// the "how" of storage (filesystem vs memory) while [`super::ReminderStore`]
/// covers the "what".
pub trait KvBackend {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`. Must be atomic.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}
