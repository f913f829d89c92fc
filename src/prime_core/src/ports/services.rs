use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::{
    domain::{ExternalAssertion, IssuedToken, Password, PasswordDigest, Principal, TokenError},
    error::AuthError,
};

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Stored digest is not a valid password hash")]
    MalformedDigest,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl From<PasswordHashError> for AuthError {
    fn from(e: PasswordHashError) -> Self {
        AuthError::Unexpected(e.to_string())
    }
}

/// Adaptive, salted one-way password hashing.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError>;

    /// Constant-time comparison. A mismatch is `Ok(false)`, not an error.
    async fn verify(
        &self,
        password: &Password,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError>;

    /// A digest that matches no real password. Verified against when no
    /// identity was found so lookups do not leak through timing.
    fn decoy_digest(&self) -> &PasswordDigest;
}

/// Issues and verifies signed, time-limited bearer tokens.
pub trait TokenService: Send + Sync {
    fn issue(&self, principal: &Principal, ttl: Duration) -> Result<IssuedToken, TokenError>;
    fn verify(&self, token: &str) -> Result<Principal, TokenError>;
    fn default_ttl(&self) -> Duration;
}

#[derive(Debug, Error)]
pub enum AssertionError {
    #[error("Assertion could not be verified: {0}")]
    Unverified(String),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl From<AssertionError> for AuthError {
    fn from(e: AssertionError) -> Self {
        match e {
            AssertionError::Unverified(_) => AuthError::UpstreamAssertionUnverified,
            AssertionError::UnexpectedError(msg) => AuthError::Unexpected(msg),
        }
    }
}

/// Turns an opaque provider credential into trusted identity claims.
#[async_trait]
pub trait AssertionVerifier: Send + Sync {
    async fn verify(&self, assertion: &str) -> Result<ExternalAssertion, AssertionError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
