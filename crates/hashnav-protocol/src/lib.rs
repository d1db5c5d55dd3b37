//! Hash-fragment navigation.
//!
//! This crate keeps an in-memory [`Location`](hashnav_types::Location) in
//! sync with the `#fragment` of a browsing context, so that an application
//! can treat hash navigation as a history stack: push and replace entries,
//! hear about back/forward, and attach arbitrary state to each entry.
//!
//! State does not fit in the URL. A stateful location is written as its
//! path plus one query parameter (by default `_k`) holding a key; the state
//! itself goes to a [`StateStore`](hashnav_store::StateStore) under that key.
//!
//! # Architecture
//!
//! - [`HashWindow`] is the environment: the URL, two ways to write it,
//!   session history traversal and `hashchange` registration.
//!   [`MemoryWindow`] simulates one tab; `WebWindow` (feature `web`) wraps the
//!   browser's `window`.
//! - [`HashProtocol`] owns a window, a store, a codec and the deduplication
//!   state. It derives locations from the hash, filters change notifications
//!   and performs push/replace.
//!
//! # Modules
//!
//! - [`error`] — [`ProtocolError`]
//! - [`config`] — [`HashHistoryConfig`]
//! - [`traits`] — The [`HashWindow`] trait
//! - [`hash`] — Raw hash accessors
//! - [`location`] — Location derivation from the hash
//! - [`protocol`] — [`HashProtocol`] and [`Subscription`]
//! - [`memory`] — [`MemoryWindow`]

pub mod config;
pub mod error;
pub mod hash;
pub mod location;
pub mod memory;
pub mod protocol;
pub mod traits;
#[cfg(feature = "web")]
pub mod web;

pub use config::{validate_query_key, HashHistoryConfig, DEFAULT_QUERY_KEY};
pub use error::{ProtocolError, ProtocolResult};
pub use hash::{get_hash_path, push_hash_path, replace_hash_path};
pub use location::read_location;
pub use memory::{HashChange, MemoryWindow};
pub use protocol::{HashProtocol, Subscription, UpdateOutcome};
pub use traits::{HandlerId, HashChangeHandler, HashWindow, HASH_CHANGE_EVENT};
#[cfg(feature = "web")]
pub use web::WebWindow;
