use prime_core::{AssertionVerifier, AuthError, TokenService, UserDirectory};

use crate::use_cases::{resolve_oauth::OAuthIdentityResolver, session::AuthSession};

/// External sign-in: verify the provider assertion, resolve it to an
/// identity, then issue a token.
pub struct GoogleSignInUseCase<'a, V: ?Sized, U: ?Sized, T: ?Sized> {
    verifier: &'a V,
    resolver: OAuthIdentityResolver<'a, U>,
    tokens: &'a T,
}

impl<'a, V, U, T> GoogleSignInUseCase<'a, V, U, T>
where
    V: AssertionVerifier + ?Sized,
    U: UserDirectory + ?Sized,
    T: TokenService + ?Sized,
{
    pub fn new(verifier: &'a V, directory: &'a U, tokens: &'a T) -> Self {
        Self {
            verifier,
            resolver: OAuthIdentityResolver::new(directory),
            tokens,
        }
    }

    #[tracing::instrument(name = "GoogleSignInUseCase::execute", skip_all)]
    pub async fn execute(&self, assertion: &str) -> Result<AuthSession, AuthError> {
        let claims = self.verifier.verify(assertion).await.inspect_err(|e| {
            tracing::warn!(error = %e, "External assertion rejected");
        })?;

        let principal = self
            .resolver
            .resolve(
                claims.provider,
                &claims.external_id,
                &claims.email,
                claims.name.as_deref(),
            )
            .await?;
        let token = self.tokens.issue(&principal, self.tokens.default_ttl())?;

        Ok(AuthSession { principal, token })
    }
}
