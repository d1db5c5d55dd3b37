use rand::Rng;

/// Number of characters in a generated key.
pub const KEY_LENGTH: usize = 6;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a random lowercase base-36 key.
///
/// Keys travel inside the hash query string, so they only use characters
/// that need no escaping there.
pub fn create_key() -> String {
    let mut rng = rand::thread_rng();
    (0..KEY_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Returns `true` if `key` reads back intact from a hash query string.
///
/// Only non-empty ASCII alphanumeric keys are recognized when the hash is
/// parsed again.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric())
}
