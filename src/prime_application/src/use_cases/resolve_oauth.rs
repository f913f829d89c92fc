use prime_core::{
    AuthError, Email, ExternalId, Identity, Principal, Provider, UniqueKey, UserDirectory,
    UserDirectoryError, Username,
};

const MAX_ATTEMPTS: usize = 3;

enum Attempt {
    Resolved(Principal),
    Conflict(UniqueKey),
}

/// Maps a verified external sign-in onto exactly one identity.
///
/// Resolution order:
/// 1. an identity already linked to `(provider, external_id)`,
/// 2. an identity with the same email, which gets linked,
/// 3. a freshly provisioned `CUSTOMER` identity named after the email.
///
/// Concurrent first sign-ins race between steps 1 and 3. The directory's
/// unique constraints pick the winner and the loser starts over from step 1.
pub struct OAuthIdentityResolver<'a, U: ?Sized> {
    directory: &'a U,
}

impl<'a, U> OAuthIdentityResolver<'a, U>
where
    U: UserDirectory + ?Sized,
{
    pub fn new(directory: &'a U) -> Self {
        Self { directory }
    }

    #[tracing::instrument(
        name = "OAuthIdentityResolver::resolve",
        skip(self, external_id, email, name),
        fields(provider = %provider)
    )]
    pub async fn resolve(
        &self,
        provider: Provider,
        external_id: &ExternalId,
        email: &Email,
        name: Option<&str>,
    ) -> Result<Principal, AuthError> {
        let mut last_conflict = UniqueKey::ProviderExternalId;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.attempt(provider, external_id, email, name).await? {
                Attempt::Resolved(principal) => return Ok(principal),
                Attempt::Conflict(key) => {
                    tracing::debug!(attempt, conflict = key.as_str(), "Lost sign-in race, retrying");
                    last_conflict = key;
                }
            }
        }

        tracing::warn!(conflict = last_conflict.as_str(), "Giving up on external sign-in");
        Err(AuthError::DuplicateIdentity(last_conflict))
    }

    async fn attempt(
        &self,
        provider: Provider,
        external_id: &ExternalId,
        email: &Email,
        name: Option<&str>,
    ) -> Result<Attempt, AuthError> {
        if let Some(identity) = self
            .directory
            .find_by_provider_id(provider, external_id)
            .await?
        {
            return Ok(Attempt::Resolved(identity.principal()));
        }

        let identity = match self.directory.find_by_email(email).await? {
            Some(mut existing) => {
                existing.link_external(provider, external_id.clone())?;
                tracing::info!(username = %existing.username(), "Linking external account");
                existing
            }
            None => Identity::provision_external(
                provider,
                external_id.clone(),
                email.clone(),
                name.map(str::to_owned),
            )?,
        };

        let username = identity.username().clone();
        match self.directory.save(identity).await {
            Ok(saved) => Ok(Attempt::Resolved(saved.principal())),
            Err(UserDirectoryError::UniqueViolation(UniqueKey::Username)) => {
                self.username_conflict(&username, provider, external_id, email)
                    .await
            }
            Err(UserDirectoryError::UniqueViolation(key)) => Ok(Attempt::Conflict(key)),
            Err(e) => Err(e.into()),
        }
    }

    /// A concurrent sign-in of the same person leaves an identity holding
    /// our email or external id. Anything else holding the username will
    /// still be there on the next attempt.
    async fn username_conflict(
        &self,
        username: &Username,
        provider: Provider,
        external_id: &ExternalId,
        email: &Email,
    ) -> Result<Attempt, AuthError> {
        let Some(holder) = self.directory.find_by_username(username).await? else {
            return Ok(Attempt::Conflict(UniqueKey::Username));
        };

        let same_person = holder.email() == email
            || (holder.provider() == provider && holder.external_id() == Some(external_id));
        if same_person {
            return Ok(Attempt::Conflict(UniqueKey::Username));
        }

        tracing::warn!(username = %username, "Username for external sign-in is held by another identity");
        Err(AuthError::UsernameUnavailable(username.as_str().to_owned()))
    }
}
