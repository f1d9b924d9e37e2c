//! In-memory, thread-safe flag store.

use brgy_store::{FlagStore, StoreError};
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory [`FlagStore`] that counts writes.
pub struct NullFlagStore {
    entries: Mutex<HashMap<String, String>>,
    writes: Mutex<usize>,
    fail_writes: bool,
}

impl NullFlagStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            writes: Mutex::new(0),
            fail_writes: false,
        }
    }

    /// A store whose writes always fail (reads still work).
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }

    /// Number of successful `set` calls.
    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl Default for NullFlagStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagStore for NullFlagStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Backend("null store configured to fail".into()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}
