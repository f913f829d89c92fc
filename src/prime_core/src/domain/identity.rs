use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    email::Email,
    password::PasswordDigest,
    principal::Principal,
    provider::{ExternalId, Provider},
    role::Role,
    username::Username,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Local identities cannot carry an external id")]
    LocalWithExternalId,
    #[error("External identities require an external id")]
    MissingExternalId,
    #[error("Cannot link the local provider")]
    LinkToLocalProvider,
    #[error("Identity is already linked to a different external account")]
    AlreadyLinked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityId(Uuid);

impl IdentityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for IdentityId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for IdentityId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A persisted account.
///
/// `external_id` is present exactly when `provider` is external. The only
/// mutation after creation is [`Identity::link_external`].
#[derive(Debug, Clone)]
pub struct Identity {
    id: IdentityId,
    username: Username,
    email: Email,
    password_hash: Option<PasswordDigest>,
    role: Role,
    provider: Provider,
    external_id: Option<ExternalId>,
    name: Option<String>,
}

/// Raw stored fields, used by directories to rebuild an [`Identity`].
#[derive(Debug, Clone)]
pub struct IdentityParts {
    pub id: IdentityId,
    pub username: Username,
    pub email: Email,
    pub password_hash: Option<PasswordDigest>,
    pub role: Role,
    pub provider: Provider,
    pub external_id: Option<ExternalId>,
    pub name: Option<String>,
}

impl Identity {
    /// Password-based identity created by self-service registration.
    pub fn register_local(
        username: Username,
        email: Email,
        password_hash: PasswordDigest,
        role: Role,
        name: Option<String>,
    ) -> Self {
        Self {
            id: IdentityId::new(),
            username,
            email,
            password_hash: Some(password_hash),
            role,
            provider: Provider::Local,
            external_id: None,
            name,
        }
    }

    /// Identity created on first sign-in through an external provider.
    /// The email doubles as the username and the role is always `CUSTOMER`.
    pub fn provision_external(
        provider: Provider,
        external_id: ExternalId,
        email: Email,
        name: Option<String>,
    ) -> Result<Self, IdentityError> {
        if !provider.is_external() {
            return Err(IdentityError::LinkToLocalProvider);
        }

        Ok(Self {
            id: IdentityId::new(),
            username: Username::from(&email),
            email,
            password_hash: None,
            role: Role::Customer,
            provider,
            external_id: Some(external_id),
            name,
        })
    }

    pub fn restore(parts: IdentityParts) -> Result<Self, IdentityError> {
        match (parts.provider.is_external(), parts.external_id.is_some()) {
            (false, true) => return Err(IdentityError::LocalWithExternalId),
            (true, false) => return Err(IdentityError::MissingExternalId),
            _ => {}
        }

        Ok(Self {
            id: parts.id,
            username: parts.username,
            email: parts.email,
            password_hash: parts.password_hash,
            role: parts.role,
            provider: parts.provider,
            external_id: parts.external_id,
            name: parts.name,
        })
    }

    /// Attach an external account. Role, username and password are kept.
    /// Re-linking the same pair is a no-op; replacing a different pair is refused.
    pub fn link_external(
        &mut self,
        provider: Provider,
        external_id: ExternalId,
    ) -> Result<(), IdentityError> {
        if !provider.is_external() {
            return Err(IdentityError::LinkToLocalProvider);
        }

        match &self.external_id {
            Some(existing) if self.provider == provider && *existing == external_id => Ok(()),
            Some(_) => Err(IdentityError::AlreadyLinked),
            None => {
                self.provider = provider;
                self.external_id = Some(external_id);
                Ok(())
            }
        }
    }

    pub fn principal(&self) -> Principal {
        Principal::new(self.username.clone(), self.role)
    }

    pub fn id(&self) -> IdentityId {
        self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> Option<&PasswordDigest> {
        self.password_hash.as_ref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn external_id(&self) -> Option<&ExternalId> {
        self.external_id.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
