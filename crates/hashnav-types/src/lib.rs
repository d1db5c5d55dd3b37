//! Foundation types for hashnav.
//!
//! # Key Types
//!
//! - [`Location`] — One navigable point: path, optional state and its key
//! - [`Action`] — How a location was reached (push, replace, pop)
//! - [`create_key`] — Random state-lookup key generation
//! - [`is_valid_key`] — Whether a key survives the trip through the hash

pub mod key;
pub mod location;

pub use key::{create_key, is_valid_key, KEY_LENGTH};
pub use location::{Action, Location};
