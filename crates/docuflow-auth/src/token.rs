//! Opaque access tokens.
//!
//! Tokens are random strings with a recognizable prefix. The server
//! stores only the SHA-256 digest; presenting the cleartext token is the
//! only way to resolve a session.

use chrono::Duration;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Prefix identifying DocuFlow access tokens.
pub const TOKEN_PREFIX: &str = "df_at_";

/// Random characters following the prefix.
const TOKEN_RANDOM_LENGTH: usize = 48;

/// Token lifetime: 24 hours from issue.
pub fn default_token_ttl() -> Duration {
    Duration::hours(24)
}

/// Generate a cryptographically random string from an alphanumeric charset.
fn generate_secret(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Generate a fresh access token.
pub fn generate_token() -> String {
    format!("{}{}", TOKEN_PREFIX, generate_secret(TOKEN_RANDOM_LENGTH))
}

/// SHA-256 digest of a token, hex-encoded, as stored in the database.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Quick shape check before hitting the database: correct prefix and
/// expected overall length.
pub fn looks_like_token(token: &str) -> bool {
    token.len() == TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH
        && token.starts_with(TOKEN_PREFIX)
        && token[TOKEN_PREFIX.len()..]
            .bytes()
            .all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_have_expected_shape() {
        let token = generate_token();
        assert!(looks_like_token(&token));
        assert!(token.starts_with(TOKEN_PREFIX));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn test_hash_token_is_deterministic_hex() {
        let token = generate_token();
        let a = hash_token(&token);
        let b = hash_token(&token);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.bytes().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_differs_per_token() {
        assert_ne!(hash_token("df_at_aaa"), hash_token("df_at_bbb"));
    }

    #[test]
    fn test_looks_like_token_rejects_garbage() {
        assert!(!looks_like_token(""));
        assert!(!looks_like_token("bearer-something"));
        assert!(!looks_like_token("df_at_short"));
        // right length, wrong charset
        let bad = format!("{}{}", TOKEN_PREFIX, "!".repeat(TOKEN_RANDOM_LENGTH));
        assert!(!looks_like_token(&bad));
    }

    #[test]
    fn test_default_ttl_is_24_hours() {
        assert_eq!(default_token_ttl().num_hours(), 24);
    }
}
