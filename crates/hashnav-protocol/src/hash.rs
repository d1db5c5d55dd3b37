//! Raw reads and writes of the URL hash.
//!
//! The hash is always taken from the full `href`. Browsers disagree on
//! whether the `hash` property comes back percent-decoded, so it is never
//! consulted.

use crate::traits::HashWindow;

/// Everything after the first `#` of the current URL, or `""`.
pub fn get_hash_path<W: HashWindow + ?Sized>(window: &W) -> String {
    let href = window.href();
    match href.find('#') {
        Some(idx) => href[idx + 1..].to_string(),
        None => String::new(),
    }
}

/// Write `path` as the new hash, creating a history entry.
pub fn push_hash_path<W: HashWindow + ?Sized>(window: &W, path: &str) {
    window.set_hash(path);
}

/// Rewrite the current entry's hash to `path` without a new history entry.
pub fn replace_hash_path<W: HashWindow + ?Sized>(window: &W, path: &str) {
    let href = window.href();
    let base = href.find('#').map_or(href.as_str(), |idx| &href[..idx]);
    window.replace_url(&format!("{base}#{path}"));
}
