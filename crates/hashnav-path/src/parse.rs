//! Splitting a path into its components and joining them back.

use serde::{Deserialize, Serialize};

/// A path broken into its three parts.
///
/// `search` keeps its leading `?` and `hash` its leading `#`, so joining the
/// three fields reproduces the input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPath {
    pub pathname: String,
    pub search: String,
    pub hash: String,
}

/// Strip a leading `http://host`, `https://host` or `//host` origin.
fn strip_origin(path: &str) -> &str {
    let rest = path
        .strip_prefix("http:")
        .or_else(|| path.strip_prefix("https:"))
        .unwrap_or(path);
    match rest.strip_prefix("//") {
        Some(authority) => {
            let end = authority.find('/').unwrap_or(authority.len());
            &authority[end..]
        }
        None => path,
    }
}

/// Parse a path string into pathname, search and hash.
///
/// An empty pathname becomes `/`.
///
/// # Examples
///
/// ```
/// use hashnav_path::parse_path;
///
/// let parsed = parse_path("/users?page=2#top");
/// assert_eq!(parsed.pathname, "/users");
/// assert_eq!(parsed.search, "?page=2");
/// assert_eq!(parsed.hash, "#top");
/// ```
pub fn parse_path(path: &str) -> ParsedPath {
    let mut pathname = strip_origin(path);
    let mut search = "";
    let mut hash = "";

    if let Some(idx) = pathname.find('#') {
        hash = &pathname[idx..];
        pathname = &pathname[..idx];
    }

    if let Some(idx) = pathname.find('?') {
        search = &pathname[idx..];
        pathname = &pathname[..idx];
    }

    ParsedPath {
        pathname: if pathname.is_empty() { "/" } else { pathname }.to_string(),
        search: search.to_string(),
        hash: hash.to_string(),
    }
}

/// Join path components back into a single string.
///
/// A bare `?` search is dropped. The basename, when given, is prepended
/// verbatim.
pub fn create_path(basename: Option<&str>, pathname: &str, search: &str, hash: &str) -> String {
    let mut path = String::with_capacity(
        basename.map_or(0, str::len) + pathname.len() + search.len() + hash.len(),
    );
    path.push_str(basename.unwrap_or_default());
    path.push_str(pathname);
    if !search.is_empty() && search != "?" {
        path.push_str(search);
    }
    path.push_str(hash);
    path
}

impl ParsedPath {
    /// Join this path back into a string without a basename.
    pub fn to_path(&self) -> String {
        create_path(None, &self.pathname, &self.search, &self.hash)
    }
}
