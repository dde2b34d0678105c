//! Security utilities for API key hashing and verification.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Hashes an API key using SHA-256.
pub fn hash_api_key(key: &str) -> String {
    let hash = Sha256::digest(key.as_bytes());
    hex::encode(hash)
}

/// Verifies an API key against a stored hash using constant-time comparison.
pub fn verify_api_key(input: &str, stored_hash: &str) -> bool {
    let input_hash = hash_api_key(input);
    input_hash.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

/// The set of API keys allowed to call the service, held as SHA-256 hashes.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    hashes: Vec<String>,
}

impl ApiKeys {
    /// Hashes the given raw keys. Blank entries are ignored.
    pub fn from_raw<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hashes = keys
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .map(|k| hash_api_key(&k))
            .collect();
        Self { hashes }
    }

    /// Authentication is off when no keys are configured.
    pub fn is_enabled(&self) -> bool {
        !self.hashes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Checks every stored hash so timing does not depend on the match position.
    pub fn verify(&self, key: &str) -> bool {
        self.hashes
            .iter()
            .fold(false, |found, hash| verify_api_key(key, hash) | found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_hashing() {
        let key = "sk_test_abc123";
        let hash = hash_api_key(key);

        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_api_key(key));
    }

    #[test]
    fn test_api_key_verification() {
        let key = "sk_test_abc123";
        let hash = hash_api_key(key);

        assert!(verify_api_key(key, &hash));
        assert!(!verify_api_key("wrong_key", &hash));
    }

    #[test]
    fn test_api_key_set() {
        let keys = ApiKeys::from_raw(["sk_one", " sk_two ", ""]);
        assert!(keys.is_enabled());
        assert_eq!(keys.len(), 2);
        assert!(keys.verify("sk_one"));
        assert!(keys.verify("sk_two"));
        assert!(!keys.verify("sk_three"));
    }

    #[test]
    fn test_empty_set_is_disabled() {
        let keys = ApiKeys::from_raw(Vec::<String>::new());
        assert!(!keys.is_enabled());
        assert!(!keys.verify("anything"));
    }
}
