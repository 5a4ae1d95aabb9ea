use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;
use sha2::{Digest, Sha256};

const TOKEN_LEN: usize = 32;

/// Generate a raw single-use reset token. URL-safe so it can ride in the
/// reset link path segment.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; TOKEN_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Digest stored at rest. The raw token leaves the process only inside the
/// reset email.
pub fn hash_reset_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_distinct() {
        assert_ne!(generate_reset_token(), generate_reset_token());
    }

    #[test]
    fn tokens_are_url_safe() {
        let token = generate_reset_token();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn hash_is_deterministic_and_differs_from_token() {
        let token = generate_reset_token();
        let hash = hash_reset_token(&token);
        assert_eq!(hash, hash_reset_token(&token));
        assert_ne!(hash, token);
    }
}
