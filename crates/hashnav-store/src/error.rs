//! Error types for state persistence.

use std::fmt;

/// Classification of a raw storage failure.
///
/// The set is closed: backends map whatever their medium reports onto one
/// of these kinds, and the store decides what to tolerate by kind alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// Access denied by the environment (e.g. cookies blocked).
    Security,
    /// The medium refused a write for lack of space.
    QuotaExceeded,
    /// Anything else.
    Other,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::Security => write!(f, "security"),
            FaultKind::QuotaExceeded => write!(f, "quota exceeded"),
            FaultKind::Other => write!(f, "other"),
        }
    }
}

/// A failure reported by a [`StorageBackend`](crate::StorageBackend).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} storage fault: {message}")]
pub struct StorageFault {
    pub kind: FaultKind,
    pub message: String,
}

impl StorageFault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn security(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Security, message)
    }

    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::new(FaultKind::QuotaExceeded, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Other, message)
    }
}

/// Errors that escape a [`StateStore`](crate::StateStore).
///
/// Known degraded-storage conditions never show up here; they are logged
/// and absorbed by the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The storage medium failed in a way the store does not recognize.
    #[error("storage failure: {0}")]
    Storage(#[from] StorageFault),

    /// State could not be serialized for storage.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
