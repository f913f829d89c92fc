use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

const MAX_PASSWORD_BYTES: usize = 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password must not be empty")]
    Empty,
    #[error("Password is too long")]
    TooLong,
}

/// A plaintext password supplied by a caller. Never logged, never stored.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub fn parse(raw: Secret<String>) -> Result<Self, PasswordError> {
        let value = raw.expose_secret();
        if value.trim().is_empty() {
            return Err(PasswordError::Empty);
        }
        if value.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong);
        }
        Ok(Self(raw))
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl TryFrom<Secret<String>> for Password {
    type Error = PasswordError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// One-way salted hash of a password in PHC string form.
#[derive(Debug, Clone)]
pub struct PasswordDigest(Secret<String>);

impl PasswordDigest {
    pub fn new(phc: Secret<String>) -> Self {
        Self(phc)
    }
}

impl AsRef<Secret<String>> for PasswordDigest {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
