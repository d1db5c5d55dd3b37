//! The [`Location`] value type.
//!
//! A location is one navigable point: a path split into pathname, search and
//! hash, plus optional application state. State never travels in the URL
//! itself; instead a location that carries state also carries a `key` under
//! which the state is persisted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use hashnav_path::{create_path, parse_path};

use crate::key::create_key;

/// How the navigation to a location happened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// A new history entry was appended.
    Push,
    /// The current history entry was rewritten.
    Replace,
    /// The entry was reached by the environment (initial load, back/forward).
    #[default]
    Pop,
}

/// One navigable point.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Path without search or hash, e.g. `/inbox`.
    pub pathname: String,
    /// Query string including the leading `?`, or empty.
    pub search: String,
    /// Fragment including the leading `#`, or empty.
    pub hash: String,
    /// Application state associated with this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    /// State-lookup key. Present whenever `state` is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Prefix prepended to `pathname` when the location is written out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basename: Option<String>,
    #[serde(default)]
    pub action: Action,
}

impl Location {
    /// Build a location from a path string such as `/inbox?page=2`.
    pub fn parse(path: &str) -> Self {
        let parsed = parse_path(path);
        Self {
            pathname: parsed.pathname,
            search: parsed.search,
            hash: parsed.hash,
            ..Self::default()
        }
    }

    /// Attach state. A fresh key is generated if none is set yet.
    pub fn with_state(mut self, state: Value) -> Self {
        self.state = Some(state);
        if self.key.is_none() {
            self.key = Some(create_key());
        }
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = Some(basename.into());
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// The full path with basename re-applied, e.g. `/app/inbox?page=2#top`.
    pub fn path(&self) -> String {
        create_path(
            self.basename.as_deref(),
            &self.pathname,
            &self.search,
            &self.hash,
        )
    }

    /// `basename + pathname + search`, the part compared for equivalence.
    pub fn route(&self) -> String {
        let basename = self.basename.as_deref().unwrap_or_default();
        format!("{basename}{}{}", self.pathname, self.search)
    }

    /// Returns `true` if both locations name the same navigation target.
    ///
    /// Matching keys decide when both sides carry one; otherwise the routes
    /// are compared.
    pub fn is_equivalent(&self, other: &Location) -> bool {
        if let (Some(a), Some(b)) = (&self.key, &other.key) {
            if a == b {
                return true;
            }
        }
        self.route() == other.route()
    }
}
