use std::fmt;

use chrono::{DateTime, Utc};
use octavian_db::models::Platform;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Letters, digits and twelve symbols: 74 characters.
pub const SECRET_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+";

/// Draws `length` characters uniformly from [`SECRET_ALPHABET`].
pub fn generate_secret(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| SECRET_ALPHABET[rng.random_range(0..SECRET_ALPHABET.len())] as char)
        .collect()
}

/// Hex SHA-256 of a secret. This is what gets persisted.
pub fn digest_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// A freshly rotated secret. The plaintext exists only in this value.
pub struct RotatedSecret {
    secret: String,
    platform: Platform,
    expires_at: DateTime<Utc>,
}

impl RotatedSecret {
    pub(crate) fn new(secret: String, platform: Platform, expires_at: DateTime<Utc>) -> Self {
        Self {
            secret,
            platform,
            expires_at,
        }
    }

    pub fn expose(&self) -> &str {
        &self.secret
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl fmt::Debug for RotatedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatedSecret")
            .field("secret", &"<redacted>")
            .field("platform", &self.platform)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
