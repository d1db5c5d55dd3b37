use serde::{Deserialize, Serialize};

use hashnav_path::HashType;

use crate::error::{ProtocolError, ProtocolResult};

/// Query parameter name used when none is configured.
pub const DEFAULT_QUERY_KEY: &str = "_k";

/// Configuration for a [`HashProtocol`](crate::HashProtocol).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashHistoryConfig {
    /// How logical paths are written into the hash.
    pub hash_type: HashType,
    /// Query parameter that carries the state-lookup key.
    pub query_key: String,
}

impl Default for HashHistoryConfig {
    fn default() -> Self {
        Self {
            hash_type: HashType::default(),
            query_key: DEFAULT_QUERY_KEY.to_string(),
        }
    }
}

impl HashHistoryConfig {
    pub fn with_hash_type(mut self, hash_type: HashType) -> Self {
        self.hash_type = hash_type;
        self
    }

    pub fn with_query_key(mut self, query_key: impl Into<String>) -> Self {
        self.query_key = query_key.into();
        self
    }

    /// Check that the query key survives a round trip through the hash.
    pub fn validate(&self) -> ProtocolResult<()> {
        validate_query_key(&self.query_key)
    }
}

/// Reject query keys that would not read back from the hash unchanged.
pub fn validate_query_key(query_key: &str) -> ProtocolResult<()> {
    if query_key.is_empty() {
        return Err(ProtocolError::InvalidQueryKey {
            key: query_key.to_string(),
            reason: "query key must not be empty".into(),
        });
    }
    if let Some(ch) = query_key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(ProtocolError::InvalidQueryKey {
            key: query_key.to_string(),
            reason: format!("contains forbidden character: {ch:?}"),
        });
    }
    Ok(())
}
