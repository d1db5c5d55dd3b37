//! Error types for the hash protocol.

use hashnav_store::StoreError;
use thiserror::Error;

/// Errors that can occur while reading or updating the hash location.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The state store failed in a way it could not absorb.
    #[error("state store error: {0}")]
    Store(#[from] StoreError),

    /// The configured query key cannot be carried in a hash query string.
    #[error("invalid query key {key:?}: {reason}")]
    InvalidQueryKey { key: String, reason: String },
}

/// Convenience type alias for protocol operations.
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;
