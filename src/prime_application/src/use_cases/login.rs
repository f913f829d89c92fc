use prime_core::{AuthError, Password, PasswordHasher, TokenService, UserDirectory};

use crate::use_cases::{authenticate::CredentialAuthenticator, session::AuthSession};

/// Password login: authenticate, then issue a token for the principal.
pub struct LoginUseCase<'a, U: ?Sized, H: ?Sized, T: ?Sized> {
    authenticator: CredentialAuthenticator<'a, U, H>,
    tokens: &'a T,
}

impl<'a, U, H, T> LoginUseCase<'a, U, H, T>
where
    U: UserDirectory + ?Sized,
    H: PasswordHasher + ?Sized,
    T: TokenService + ?Sized,
{
    pub fn new(directory: &'a U, hasher: &'a H, tokens: &'a T) -> Self {
        Self {
            authenticator: CredentialAuthenticator::new(directory, hasher),
            tokens,
        }
    }

    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        identifier: &str,
        password: &Password,
    ) -> Result<AuthSession, AuthError> {
        let principal = self.authenticator.authenticate(identifier, password).await?;
        let token = self.tokens.issue(&principal, self.tokens.default_ttl())?;

        Ok(AuthSession { principal, token })
    }
}
