use async_trait::async_trait;
use thiserror::Error;

use crate::{
    domain::{Email, ExternalId, Identity, Provider, Username},
    error::{AuthError, UniqueKey},
};

#[derive(Debug, Error)]
pub enum UserDirectoryError {
    #[error("Unique constraint violated on {}", .0.as_str())]
    UniqueViolation(UniqueKey),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for UserDirectoryError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UniqueViolation(a), Self::UniqueViolation(b)) => a == b,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

impl From<UserDirectoryError> for AuthError {
    fn from(e: UserDirectoryError) -> Self {
        match e {
            UserDirectoryError::UniqueViolation(key) => AuthError::DuplicateIdentity(key),
            UserDirectoryError::UnexpectedError(msg) => AuthError::Unexpected(msg),
        }
    }
}

/// Persistent identity storage.
///
/// Username, email and (provider, external id) are each unique. `save` is an
/// upsert keyed on the identity id and must reject any write that would break
/// one of those uniqueness rules with [`UserDirectoryError::UniqueViolation`].
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, UserDirectoryError>;
    async fn find_by_email(&self, email: &Email) -> Result<Option<Identity>, UserDirectoryError>;
    async fn find_by_provider_id(
        &self,
        provider: Provider,
        external_id: &ExternalId,
    ) -> Result<Option<Identity>, UserDirectoryError>;
    async fn save(&self, identity: Identity) -> Result<Identity, UserDirectoryError>;

    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserDirectoryError> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn exists_by_email(&self, email: &Email) -> Result<bool, UserDirectoryError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
