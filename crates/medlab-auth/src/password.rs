//! Password encoding.
//!
//! Encoded passwords carry their scheme: Argon2 hashes are PHC strings
//! (`$argon2id$...`) and plain-text passwords carry a `{noop}` prefix.
//! [`verify_encoded`] picks the scheme from the encoded value, so records
//! written by either encoder can be checked.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Prefix of passwords stored without hashing.
pub const NOOP_PREFIX: &str = "{noop}";

/// Encodes raw passwords and checks raw passwords against encoded ones.
pub trait PasswordEncoder: Send + Sync {
    /// Encodes `raw` for storage.
    fn encode(&self, raw: &str) -> Result<String, AuthError>;

    /// Returns `true` if `raw` matches `encoded`.
    fn matches(&self, raw: &str, encoded: &str) -> Result<bool, AuthError>;
}

/// Argon2id encoder with default parameters and a random salt per hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordEncoder;

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default().hash_password(raw.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    fn matches(&self, raw: &str, encoded: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(encoded)?;
        Ok(Argon2::default()
            .verify_password(raw.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// Stores passwords as plain text behind the `{noop}` prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPasswordEncoder;

impl PasswordEncoder for NoopPasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, AuthError> {
        Ok(format!("{NOOP_PREFIX}{raw}"))
    }

    fn matches(&self, raw: &str, encoded: &str) -> Result<bool, AuthError> {
        Ok(encoded.strip_prefix(NOOP_PREFIX) == Some(raw))
    }
}

/// Which encoder new password records are written with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordEncoding {
    #[default]
    Argon2,
    Noop,
}

impl PasswordEncoding {
    /// Returns the encoder for this setting.
    pub fn encoder(self) -> Box<dyn PasswordEncoder> {
        match self {
            Self::Argon2 => Box::new(Argon2PasswordEncoder),
            Self::Noop => Box::new(NoopPasswordEncoder),
        }
    }
}

/// Checks `raw` against an encoded password of any supported scheme.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if the encoded value has an unknown
/// scheme or is not a valid hash.
pub fn verify_encoded(raw: &str, encoded: &str) -> Result<bool, AuthError> {
    if encoded.starts_with(NOOP_PREFIX) {
        NoopPasswordEncoder.matches(raw, encoded)
    } else if encoded.starts_with("$argon2") {
        Argon2PasswordEncoder.matches(raw, encoded)
    } else {
        Err(AuthError::PasswordHash {
            message: "unrecognised password encoding".to_string(),
        })
    }
}
