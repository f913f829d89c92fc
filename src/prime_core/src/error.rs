use thiserror::Error;

use crate::domain::{
    EmailError, IdentityError, PasswordError, ProviderError, RoleError, TokenError,
    UsernameError,
};

/// Which uniquely-indexed field an operation collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    Username,
    Email,
    ProviderExternalId,
}

impl UniqueKey {
    pub fn as_str(self) -> &'static str {
        match self {
            UniqueKey::Username => "username",
            UniqueKey::Email => "email",
            UniqueKey::ProviderExternalId => "external account",
        }
    }
}

/// Error taxonomy shared by every identity and access-control operation.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("An account with this {} already exists", .0.as_str())]
    DuplicateIdentity(UniqueKey),
    /// The username an external sign-in would be provisioned under belongs
    /// to an unrelated identity. Not retryable.
    #[error("The username {0} is held by another account")]
    UsernameUnavailable(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing bearer token")]
    MissingToken,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("Access denied")]
    InsufficientRole,
    #[error("External assertion could not be verified")]
    UpstreamAssertionUnverified,
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl PartialEq for AuthError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(_), Self::Validation(_)) => true,
            (Self::DuplicateIdentity(a), Self::DuplicateIdentity(b)) => a == b,
            (Self::UsernameUnavailable(a), Self::UsernameUnavailable(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::MissingToken, Self::MissingToken) => true,
            (Self::Token(a), Self::Token(b)) => a == b,
            (Self::InsufficientRole, Self::InsufficientRole) => true,
            (Self::UpstreamAssertionUnverified, Self::UpstreamAssertionUnverified) => true,
            (Self::Unexpected(_), Self::Unexpected(_)) => true,
            _ => false,
        }
    }
}

macro_rules! validation_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for AuthError {
                fn from(e: $ty) -> Self {
                    AuthError::Validation(e.to_string())
                }
            }
        )*
    };
}

validation_from!(EmailError, UsernameError, PasswordError, RoleError, ProviderError);

impl From<IdentityError> for AuthError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::AlreadyLinked => {
                AuthError::DuplicateIdentity(UniqueKey::ProviderExternalId)
            }
            other => AuthError::Unexpected(other.to_string()),
        }
    }
}
