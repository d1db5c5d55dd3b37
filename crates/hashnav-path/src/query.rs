//! Single-value query-string helpers.
//!
//! Values are restricted to ASCII alphanumerics: a value ends at the first
//! character outside `[A-Za-z0-9]`. That is the alphabet state keys are
//! generated from, and it keeps the helpers free of percent-decoding.

use crate::parse::{create_path, parse_path};

/// Location of a `key=value` pair inside a search string.
struct Pair {
    /// Index of the `?` or `&` that precedes the key.
    prefix: usize,
    value_start: usize,
    value_end: usize,
}

fn find_pair(search: &str, key: &str) -> Option<Pair> {
    let bytes = search.as_bytes();
    for (prefix, &b) in bytes.iter().enumerate() {
        if b != b'?' && b != b'&' {
            continue;
        }
        let after = &search[prefix + 1..];
        let Some(rest) = after.strip_prefix(key).and_then(|r| r.strip_prefix('=')) else {
            continue;
        };
        let len = rest
            .bytes()
            .take_while(u8::is_ascii_alphanumeric)
            .count();
        if len == 0 {
            continue;
        }
        let value_start = prefix + 1 + key.len() + 1;
        return Some(Pair {
            prefix,
            value_start,
            value_end: value_start + len,
        });
    }
    None
}

/// Read the value of `key` from the query part of `path`.
///
/// Returns the first match only.
///
/// # Examples
///
/// ```
/// use hashnav_path::get_query_value;
///
/// assert_eq!(get_query_value("/a?_k=x7f2&page=2", "_k").as_deref(), Some("x7f2"));
/// assert_eq!(get_query_value("/a?page=2", "_k"), None);
/// ```
pub fn get_query_value(path: &str, key: &str) -> Option<String> {
    let parsed = parse_path(path);
    find_pair(&parsed.search, key)
        .map(|pair| parsed.search[pair.value_start..pair.value_end].to_string())
}

/// Remove the first `key=value` pair from the query part of `path`.
///
/// The remaining pairs keep their order. A query left empty is dropped.
pub fn strip_query_value(path: &str, key: &str) -> String {
    let parsed = parse_path(path);
    let Some(pair) = find_pair(&parsed.search, key) else {
        return parsed.to_path();
    };

    let search = &parsed.search;
    let mut end = pair.value_end;
    let has_suffix = search[end..].starts_with('&');
    if has_suffix {
        end += 1;
    }

    let replacement = if search.as_bytes()[pair.prefix] == b'?' {
        "?"
    } else if has_suffix {
        "&"
    } else {
        ""
    };

    let stripped = format!("{}{}{}", &search[..pair.prefix], replacement, &search[end..]);
    create_path(None, &parsed.pathname, &stripped, &parsed.hash)
}

/// Append `key=value` to the query part of `path`, ahead of any hash.
pub fn add_query_value(path: &str, key: &str, value: &str) -> String {
    let parsed = parse_path(path);
    let separator = if parsed.search.contains('?') { '&' } else { '?' };
    let search = format!("{}{separator}{key}={value}", parsed.search);
    create_path(None, &parsed.pathname, &search, &parsed.hash)
}
