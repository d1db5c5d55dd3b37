//! Deriving a [`Location`] from the current hash.

use hashnav_path::{get_query_value, strip_query_value, PathCoder};
use hashnav_store::StateStore;
use hashnav_types::Location;

use crate::error::ProtocolResult;
use crate::hash::get_hash_path;
use crate::traits::HashWindow;

/// Build the location the hash currently points at.
///
/// The hash is decoded with `coder`. If it carries a `query_key` parameter,
/// that parameter is removed from the path and its value is used to look up
/// persisted state. Missing state is not an error. An empty hash yields the
/// root location.
pub fn read_location<W, S>(
    window: &W,
    store: &S,
    coder: &dyn PathCoder,
    query_key: &str,
) -> ProtocolResult<Location>
where
    W: HashWindow + ?Sized,
    S: StateStore + ?Sized,
{
    let mut path = coder.decode_path(&get_hash_path(window));
    let key = get_query_value(&path, query_key);

    let mut state = None;
    if let Some(key) = key.as_deref() {
        path = strip_query_value(&path, query_key);
        state = store.read_state(key)?;
    }

    let mut location = Location::parse(&path);
    location.state = state;
    location.key = key;
    Ok(location)
}
