//! Hash path codecs.
//!
//! A codec maps a logical path (starting with exactly one `/`) to the string that
//! is actually written after the `#`, and back. For every logical path `p`
//! each codec guarantees:
//!
//! - `decode_path(encode_path(p)) == p`
//! - `encode_path(encode_path(p)) == encode_path(p)`
//!
//! The second law lets a change handler re-encode whatever it finds in the
//! hash and compare: a hash already in encoded form is left alone.

use serde::{Deserialize, Serialize};

/// Translation between a logical path and its hash-safe form.
pub trait PathCoder {
    /// Logical path to the string stored after `#`.
    fn encode_path(&self, path: &str) -> String;

    /// Hash contents back to a logical path.
    fn decode_path(&self, path: &str) -> String;
}

impl<T: PathCoder + ?Sized> PathCoder for Box<T> {
    fn encode_path(&self, path: &str) -> String {
        (**self).encode_path(path)
    }

    fn decode_path(&self, path: &str) -> String {
        (**self).decode_path(path)
    }
}

fn add_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn strip_leading_slash(path: &str) -> String {
    path.strip_prefix('/').unwrap_or(path).to_string()
}

/// Stores the logical path as-is: `#/inbox`.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityCoder;

impl PathCoder for IdentityCoder {
    fn encode_path(&self, path: &str) -> String {
        path.to_string()
    }

    fn decode_path(&self, path: &str) -> String {
        path.to_string()
    }
}

/// Guarantees a leading slash in both directions: `#/inbox`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SlashCoder;

impl PathCoder for SlashCoder {
    fn encode_path(&self, path: &str) -> String {
        add_leading_slash(path)
    }

    fn decode_path(&self, path: &str) -> String {
        add_leading_slash(path)
    }
}

/// Drops the leading slash in the hash: `#inbox`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSlashCoder;

impl PathCoder for NoSlashCoder {
    fn encode_path(&self, path: &str) -> String {
        strip_leading_slash(path)
    }

    fn decode_path(&self, path: &str) -> String {
        add_leading_slash(path)
    }
}

/// Crawlable "hash-bang" form: `#!/inbox`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashBangCoder;

impl PathCoder for HashBangCoder {
    fn encode_path(&self, path: &str) -> String {
        if path.starts_with('!') {
            path.to_string()
        } else {
            format!("!/{}", strip_leading_slash(path))
        }
    }

    fn decode_path(&self, path: &str) -> String {
        path.strip_prefix('!').unwrap_or(path).to_string()
    }
}

/// Codec selection by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashType {
    Identity,
    #[default]
    Slash,
    NoSlash,
    HashBang,
}

impl HashType {
    /// The codec for this hash type.
    pub fn coder(self) -> Box<dyn PathCoder> {
        match self {
            HashType::Identity => Box::new(IdentityCoder),
            HashType::Slash => Box::new(SlashCoder),
            HashType::NoSlash => Box::new(NoSlashCoder),
            HashType::HashBang => Box::new(HashBangCoder),
        }
    }
}
