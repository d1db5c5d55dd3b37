//! `window.sessionStorage` backend.

use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

use crate::error::{FaultKind, StorageFault};
use crate::traits::StorageBackend;

/// Map a thrown DOM exception onto a [`FaultKind`] by its `name`.
fn classify(err: JsValue) -> StorageFault {
    match err.dyn_ref::<DomException>() {
        Some(exception) => {
            let name = exception.name();
            let kind = match name.as_str() {
                "SecurityError" => FaultKind::Security,
                "QuotaExceededError" | "QUOTA_EXCEEDED_ERR" => FaultKind::QuotaExceeded,
                _ => FaultKind::Other,
            };
            StorageFault::new(kind, exception.message())
        }
        None => StorageFault::other(format!("{err:?}")),
    }
}

/// Session storage of the current browsing context.
#[derive(Clone, Debug)]
pub struct WebSessionStorage {
    storage: Storage,
}

impl WebSessionStorage {
    /// Open the window's session storage.
    ///
    /// Returns `None` when there is no window, when the storage is hidden
    /// (e.g. pages served from `file://` in some browsers), or when merely
    /// touching it throws because of privacy settings.
    pub fn open() -> Option<Self> {
        let window = web_sys::window()?;
        match window.session_storage() {
            Ok(Some(storage)) => Some(Self { storage }),
            Ok(None) => None,
            Err(err) => {
                let fault = classify(err);
                warn!(kind = %fault.kind, "session storage is not accessible");
                None
            }
        }
    }

    pub fn from_storage(storage: Storage) -> Self {
        Self { storage }
    }
}

impl StorageBackend for WebSessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageFault> {
        self.storage.get_item(key).map_err(classify)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageFault> {
        self.storage.set_item(key, value).map_err(classify)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageFault> {
        self.storage.remove_item(key).map_err(classify)
    }

    fn len(&self) -> Result<usize, StorageFault> {
        self.storage
            .length()
            .map(|n| n as usize)
            .map_err(classify)
    }
}
