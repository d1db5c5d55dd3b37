//! [`SessionStateStore`]: JSON state over a session-scoped backend.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FaultKind, StorageFault, StoreError, StoreResult};
use crate::traits::{StateStore, StorageBackend};

/// Prefix applied to every key before it reaches the backend.
pub const KEY_PREFIX: &str = "@@History/";

/// The backend key under which state for `key` is stored.
pub fn storage_key(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

/// A [`StateStore`] that serializes state as JSON into a [`StorageBackend`].
///
/// The backend is optional: hosts where session storage does not exist at
/// all (or is hidden) construct the store with [`SessionStateStore::unavailable`]
/// and every call degrades to a no-op.
#[derive(Debug)]
pub struct SessionStateStore<B> {
    backend: Option<B>,
}

impl<B: StorageBackend> SessionStateStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A store with no storage medium behind it.
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    /// Decide whether a failed write is a known degraded condition.
    fn absorb_save_fault(backend: &B, fault: StorageFault) -> StoreResult<()> {
        match fault.kind {
            FaultKind::Security => {
                warn!("unable to save state; session storage is not available due to security settings");
                Ok(())
            }
            // A zero quota on an empty storage is how private browsing
            // modes present a disabled storage. A full storage is a real
            // failure.
            FaultKind::QuotaExceeded if matches!(backend.len(), Ok(0)) => {
                warn!("unable to save state; session storage is not available in private mode");
                Ok(())
            }
            _ => Err(StoreError::Storage(fault)),
        }
    }
}

impl<B: StorageBackend> StateStore for SessionStateStore<B> {
    fn save_state(&self, key: &str, state: Option<&Value>) -> StoreResult<()> {
        let Some(backend) = self.backend.as_ref() else {
            warn!(%key, "unable to save state; session storage is not available");
            return Ok(());
        };

        let storage_key = storage_key(key);
        let result = match state {
            None | Some(Value::Null) => backend.remove_item(&storage_key),
            Some(value) => {
                let json = serde_json::to_string(value)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                backend.set_item(&storage_key, &json)
            }
        };

        match result {
            Ok(()) => Ok(()),
            Err(fault) => Self::absorb_save_fault(backend, fault),
        }
    }

    fn read_state(&self, key: &str) -> StoreResult<Option<Value>> {
        let Some(backend) = self.backend.as_ref() else {
            return Ok(None);
        };

        let json = match backend.get_item(&storage_key(key)) {
            Ok(json) => json,
            Err(fault) if fault.kind == FaultKind::Security => {
                warn!("unable to read state; session storage is not available due to security settings");
                return Ok(None);
            }
            Err(fault) => return Err(StoreError::Storage(fault)),
        };

        let Some(json) = json.filter(|j| !j.is_empty()) else {
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                debug!(%key, error = %e, "ignoring unparsable stored state");
                Ok(None)
            }
        }
    }
}
