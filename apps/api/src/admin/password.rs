//! Salted SHA-256 password hashes stored as hex.

use rand::RngCore;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub salt: String,
    pub hash: String,
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn hash_password(password: &str) -> PasswordHash {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = hex::encode(salt);
    let hash = digest(&salt, password);
    PasswordHash { salt, hash }
}

/// Compares without short-circuiting on the first differing byte.
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    let actual = digest(salt, password);
    actual.len() == expected_hash.len()
        && actual
            .bytes()
            .zip(expected_hash.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let stored = hash_password("adminpassword");
        assert_eq!(stored.salt.len(), 32);
        assert_eq!(stored.hash.len(), 64);
        assert!(verify_password("adminpassword", &stored.salt, &stored.hash));
        assert!(!verify_password("adminpassworD", &stored.salt, &stored.hash));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = hash_password("secret");
        let b = hash_password("secret");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_known_digest() {
        // sha256("") with an empty salt.
        assert_eq!(
            digest("", ""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_truncated_hash_never_matches() {
        let stored = hash_password("pw");
        assert!(!verify_password("pw", &stored.salt, &stored.hash[..10]));
    }
}
