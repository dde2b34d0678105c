//! Local placeholder tokenization.
//!
//! This is a simulation for development and tests, not a PCI-compliant vault:
//! the token is a salted one-way hash that is never looked up again.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::ports::{CardTokenizer, TokenizerError};

/// Number of hex characters kept from the digest.
pub const TOKEN_LENGTH: usize = 32;

type HmacSha256 = Hmac<Sha256>;

/// Derives tokens from the card data, a timestamp and a random nonce.
///
/// With a secret configured the digest is an HMAC-SHA256 keyed by it,
/// otherwise plain SHA-256.
#[derive(Clone, Default)]
pub struct LocalTokenizer {
    secret: Option<Vec<u8>>,
}

impl LocalTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: Some(secret.into()),
        }
    }
}

impl std::fmt::Debug for LocalTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTokenizer")
            .field("keyed", &self.secret.is_some())
            .finish()
    }
}

impl CardTokenizer for LocalTokenizer {
    fn tokenize(&self, card_number: &str, cvv: &str) -> Result<String, TokenizerError> {
        let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let nonce: u128 = rand::random();
        let material = format!("{card_number}|{cvv}|{timestamp}|{nonce:032x}");

        let digest = match &self.secret {
            Some(secret) => {
                let mut mac = HmacSha256::new_from_slice(secret)
                    .map_err(|e| TokenizerError(e.to_string()))?;
                mac.update(material.as_bytes());
                hex::encode(mac.finalize().into_bytes())
            }
            None => hex::encode(Sha256::digest(material.as_bytes())),
        };

        Ok(digest[..TOKEN_LENGTH].to_string())
    }
}
