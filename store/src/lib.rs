//! Key-value persistence for client-side flags.
//!
//! The portal remembers a handful of per-browser facts (e.g. that the
//! "residency approved" congratulation was already shown). Hosts inject any
//! [`FlagStore`]: the JSON file store here, or an in-memory one for tests.

pub mod error;
pub mod file;

pub use error::StoreError;
pub use file::JsonFileStore;

/// A tiny string key-value store.
pub trait FlagStore: Send + Sync {
    /// Read a value, `None` if the key was never set.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Whether the key holds the value `"true"`.
    fn is_set(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.as_deref() == Some("true"))
    }

    /// Set the key to `"true"`.
    fn mark(&self, key: &str) -> Result<(), StoreError> {
        self.set(key, "true")
    }
}

/// Key under which the one-time approval congratulation is remembered.
pub fn congrats_shown_key(resident: &str) -> String {
    format!("congrats_shown:{resident}")
}
