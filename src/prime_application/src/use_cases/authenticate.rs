use prime_core::{
    AuthError, Email, Identity, Password, PasswordHashError, PasswordHasher, Principal,
    UserDirectory, Username,
};

/// Checks an identifier/password pair against the user directory.
///
/// The identifier is tried as a username first, then as an email. Unknown
/// identifiers, identities without a password and wrong passwords all yield
/// the same [`AuthError::InvalidCredentials`], and a hash verification runs
/// in every case.
pub struct CredentialAuthenticator<'a, U: ?Sized, H: ?Sized> {
    directory: &'a U,
    hasher: &'a H,
}

impl<'a, U, H> CredentialAuthenticator<'a, U, H>
where
    U: UserDirectory + ?Sized,
    H: PasswordHasher + ?Sized,
{
    pub fn new(directory: &'a U, hasher: &'a H) -> Self {
        Self { directory, hasher }
    }

    #[tracing::instrument(name = "CredentialAuthenticator::authenticate", skip(self, password))]
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &Password,
    ) -> Result<Principal, AuthError> {
        let identity = self.lookup(identifier).await?;

        let digest = identity
            .as_ref()
            .and_then(Identity::password_hash)
            .unwrap_or_else(|| self.hasher.decoy_digest());

        let matches = match self.hasher.verify(password, digest).await {
            Ok(matches) => matches,
            // A corrupt stored hash can never match; the caller sees a plain rejection.
            Err(PasswordHashError::MalformedDigest) => {
                tracing::warn!(identifier, "Stored password digest is malformed");
                false
            }
            Err(e) => return Err(e.into()),
        };

        match identity {
            Some(identity) if matches && identity.password_hash().is_some() => {
                Ok(identity.principal())
            }
            _ => {
                tracing::warn!("Rejected login attempt");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn lookup(&self, identifier: &str) -> Result<Option<Identity>, AuthError> {
        if let Ok(username) = Username::parse(identifier) {
            if let Some(identity) = self.directory.find_by_username(&username).await? {
                return Ok(Some(identity));
            }
        }

        match Email::parse(identifier) {
            Ok(email) => Ok(self.directory.find_by_email(&email).await?),
            Err(_) => Ok(None),
        }
    }
}
