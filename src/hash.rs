//! Short digests used to make copied asset filenames unique.

use sha2::{Digest, Sha256};

/// Digest `content` mixed with a fresh random seed and keep the first `length` hex characters.
///
/// The seed changes on every call, so identical content produces a different token each time.
/// Lengths beyond the 64 characters of a SHA-256 hex digest are capped.
pub fn generate_hash(content: &[u8], length: usize) -> String {
  let seed: [u8; 16] = rand::random();
  let mut hasher = Sha256::new();
  hasher.update(hex::encode(seed));
  hasher.update(content);
  let mut digest = hex::encode(hasher.finalize());
  digest.truncate(length);
  digest
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn yields_requested_number_of_hex_characters() {
    let hash = generate_hash(b"body { color: red }", 8);
    assert_eq!(hash.len(), 8);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
  }

  #[test]
  fn identical_content_hashes_differently() {
    let first = generate_hash(b"same bytes", 8);
    let second = generate_hash(b"same bytes", 8);
    assert_ne!(first, second);
  }

  #[test]
  fn caps_length_at_full_digest() {
    assert_eq!(generate_hash(b"x", 200).len(), 64);
    assert!(generate_hash(b"x", 0).is_empty());
  }
}
