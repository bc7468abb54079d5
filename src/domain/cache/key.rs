//! Query fingerprinting for exact-match lookup

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Strip insignificant surrounding whitespace from a query
pub fn normalize_query(text: &str) -> &str {
    text.trim()
}

/// Fixed-length opaque identifier derived from normalized query text.
///
/// Used as the primary key of the cache store. Equality of fingerprints is a
/// proxy for equality of normalized text; no cryptographic property is relied on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Length of the hex-encoded fingerprint
    pub const LEN: usize = 64;

    /// Fingerprint text that has already been normalized
    pub fn from_normalized(normalized: &str) -> Self {
        let digest = Sha256::digest(normalized.as_bytes());
        Self(hex::encode(digest))
    }

    /// Normalize a raw query and fingerprint it
    pub fn from_query(raw: &str) -> Self {
        Self::from_normalized(normalize_query(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix suitable for log fields
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_surrounding_whitespace() {
        assert_eq!(normalize_query("  hello world \n"), "hello world");
        assert_eq!(normalize_query("hello  world"), "hello  world");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = Fingerprint::from_query("What is Rust?");
        let b = Fingerprint::from_query("What is Rust?");

        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_ignores_surrounding_whitespace() {
        let a = Fingerprint::from_query("What is Rust?");
        let b = Fingerprint::from_query("\t What is Rust?  ");

        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_distinguishes_text() {
        let a = Fingerprint::from_query("hello");
        let b = Fingerprint::from_query("Hello");

        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_fixed_length() {
        for text in ["", "a", "a much longer query about caching strategies"] {
            let key = Fingerprint::from_query(text);
            assert_eq!(key.as_str().len(), Fingerprint::LEN);
            assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_short_prefix() {
        let key = Fingerprint::from_query("hello");
        assert_eq!(key.short().len(), 8);
        assert!(key.as_str().starts_with(key.short()));
    }

    #[test]
    fn test_short_never_splits_a_character() {
        let key = Fingerprint("aéééé".to_string());
        assert_eq!(key.short(), "aéééé");

        let key = Fingerprint("abc".to_string());
        assert_eq!(key.short(), "abc");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let key = Fingerprint::from_query("hello");
        let json = serde_json::to_string(&key).unwrap();

        assert_eq!(json, format!("\"{}\"", key.as_str()));
    }
}
