//! The [`StateStore`] and [`StorageBackend`] traits.

use std::rc::Rc;

use serde_json::Value;

use crate::error::{StorageFault, StoreResult};

/// Persistence of per-entry navigation state.
///
/// Implementations absorb known degraded-storage conditions (logging a
/// warning) and only return `Err` for failures they cannot classify.
pub trait StateStore {
    /// Persist `state` under `key`.
    ///
    /// `None` or a JSON `null` removes any existing entry for `key`.
    fn save_state(&self, key: &str, state: Option<&Value>) -> StoreResult<()>;

    /// Read the state stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing usable is stored, including when the
    /// stored payload is corrupt.
    fn read_state(&self, key: &str) -> StoreResult<Option<Value>>;
}

impl<T: StateStore + ?Sized> StateStore for Rc<T> {
    fn save_state(&self, key: &str, state: Option<&Value>) -> StoreResult<()> {
        (**self).save_state(key, state)
    }

    fn read_state(&self, key: &str) -> StoreResult<Option<Value>> {
        (**self).read_state(key)
    }
}

/// A string key-value medium scoped to the browsing session.
///
/// Mirrors the Web Storage API. Every call may fail with a classified
/// [`StorageFault`].
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageFault>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageFault>;

    fn remove_item(&self, key: &str) -> Result<(), StorageFault>;

    /// Number of entries currently held.
    fn len(&self) -> Result<usize, StorageFault>;

    fn is_empty(&self) -> Result<bool, StorageFault> {
        self.len().map(|n| n == 0)
    }
}

impl<T: StorageBackend + ?Sized> StorageBackend for Rc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageFault> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageFault> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageFault> {
        (**self).remove_item(key)
    }

    fn len(&self) -> Result<usize, StorageFault> {
        (**self).len()
    }
}
