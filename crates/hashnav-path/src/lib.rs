//! Path handling for hash-based navigation.
//!
//! A hash route such as `#/inbox?filter=unread&_k=a1b2c3` carries a logical
//! path (`/inbox?filter=unread`) plus a state-lookup key smuggled through the
//! query string. This crate provides the string-level pieces needed to take
//! such a route apart and put it back together.
//!
//! # Modules
//!
//! - [`parse`] — Splitting a path into pathname/search/hash and joining it back
//! - [`query`] — Reading, adding and stripping a single query-string value
//! - [`codec`] — The [`PathCoder`] trait and the concrete hash codecs

pub mod codec;
pub mod parse;
pub mod query;

pub use codec::{HashBangCoder, HashType, IdentityCoder, NoSlashCoder, PathCoder, SlashCoder};
pub use parse::{create_path, parse_path, ParsedPath};
pub use query::{add_query_value, get_query_value, strip_query_value};
