//! Cryptographic utilities for invitation tokens.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Length of the token fingerprint written to logs.
const FINGERPRINT_LEN: usize = 12;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates a fresh invitation token.
///
/// Tokens are random (v4) UUIDs in hyphenated form, giving 122 bits of
/// entropy. The token is the only credential needed to accept an invitation.
pub fn generate_invite_token() -> String {
    Uuid::new_v4().to_string()
}

/// Short, non-reversible identifier for a token, safe to put in logs.
pub fn token_fingerprint(token: &str) -> String {
    let mut hash = sha256_hex(token);
    hash.truncate(FINGERPRINT_LEN);
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sha256_hex() {
        let hash = sha256_hex("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_empty_string() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_generate_invite_token_is_uuid_v4() {
        let token = generate_invite_token();
        let parsed = Uuid::parse_str(&token).expect("token should be a UUID");
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(token.len(), 36);
        assert!(!token.contains('/'));
    }

    #[test]
    fn test_generate_invite_token_uniqueness() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_invite_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_token_fingerprint() {
        let fp = token_fingerprint("some-token");
        assert_eq!(fp.len(), FINGERPRINT_LEN);
        assert_eq!(fp, token_fingerprint("some-token"));
        assert_ne!(fp, token_fingerprint("other-token"));
        assert!(!fp.contains("some-token"));
    }
}
