//! In-memory storage backend for tests and non-browser hosts.
//!
//! [`MemoryStorage`] keeps entries in a `BTreeMap` behind a `RwLock`. A fault
//! can be injected to simulate the ways a browser's session storage fails.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{FaultKind, StorageFault};
use crate::traits::StorageBackend;

/// An in-memory implementation of [`StorageBackend`].
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
    fault: RwLock<Option<FaultKind>>,
    writes: RwLock<usize>,
}

impl MemoryStorage {
    /// Create a new empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent item access fail with `kind`, or clear the
    /// fault with `None`.
    ///
    /// `len` keeps working unless the fault is [`FaultKind::Security`]: a
    /// medium that is blocked outright refuses every access, while a full
    /// one can still be counted.
    pub fn inject_fault(&self, kind: Option<FaultKind>) {
        *self.fault.write().expect("lock poisoned") = kind;
    }

    /// Number of successful `set_item` calls so far.
    pub fn write_count(&self) -> usize {
        *self.writes.read().expect("lock poisoned")
    }

    /// Raw access to a stored value, bypassing fault injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().expect("lock poisoned").get(key).cloned()
    }

    /// Sorted list of all stored keys.
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().expect("lock poisoned").keys().cloned().collect()
    }

    fn check(&self) -> Result<(), StorageFault> {
        match *self.fault.read().expect("lock poisoned") {
            Some(kind) => Err(StorageFault::new(kind, "injected fault")),
            None => Ok(()),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageFault> {
        self.check()?;
        Ok(self.raw(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageFault> {
        self.check()?;
        self.entries
            .write()
            .expect("lock poisoned")
            .insert(key.to_string(), value.to_string());
        *self.writes.write().expect("lock poisoned") += 1;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageFault> {
        self.check()?;
        self.entries.write().expect("lock poisoned").remove(key);
        Ok(())
    }

    fn len(&self) -> Result<usize, StorageFault> {
        if *self.fault.read().expect("lock poisoned") == Some(FaultKind::Security) {
            return Err(StorageFault::security("injected fault"));
        }
        Ok(self.entries.read().expect("lock poisoned").len())
    }
}
