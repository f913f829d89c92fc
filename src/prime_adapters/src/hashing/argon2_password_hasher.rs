use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{self, PasswordHasher as _, SaltString, rand_core},
};
use prime_core::{Password, PasswordDigest, PasswordHashError, PasswordHasher};
use rand::{Rng, distr::Alphanumeric};
use secrecy::{ExposeSecret, Secret};

use crate::config::PasswordSettings;

/// Argon2id hashing on the blocking thread pool.
pub struct Argon2PasswordHasher {
    params: Params,
    decoy: PasswordDigest,
}

impl Argon2PasswordHasher {
    pub fn new(settings: &PasswordSettings) -> Result<Self, PasswordHashError> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|e| PasswordHashError::UnexpectedError(e.to_string()))?;

        let decoy_password: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let decoy = hash_with(params.clone(), &Secret::from(decoy_password))?;

        Ok(Self { params, decoy })
    }
}

fn argon2(params: Params) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

fn hash_with(params: Params, password: &Secret<String>) -> Result<PasswordDigest, PasswordHashError> {
    let salt = SaltString::generate(rand_core::OsRng);
    argon2(params)
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map(|h| PasswordDigest::new(Secret::from(h.to_string())))
        .map_err(|e| PasswordHashError::UnexpectedError(e.to_string()))
}

#[async_trait::async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    #[tracing::instrument(name = "Computing password hash", skip_all)]
    async fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError> {
        let current_span = tracing::Span::current();
        let params = self.params.clone();
        let password = password.as_ref().clone();

        tokio::task::spawn_blocking(move || current_span.in_scope(|| hash_with(params, &password)))
            .await
            .map_err(|e| PasswordHashError::UnexpectedError(e.to_string()))?
    }

    #[tracing::instrument(name = "Verify password hash", skip_all)]
    async fn verify(
        &self,
        password: &Password,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError> {
        let current_span = tracing::Span::current();
        let params = self.params.clone();
        let password = password.as_ref().clone();
        let digest = digest.as_ref().clone();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| {
                let expected = PasswordHash::new(digest.expose_secret())
                    .map_err(|_| PasswordHashError::MalformedDigest)?;

                match argon2(params).verify_password(password.expose_secret().as_bytes(), &expected) {
                    Ok(()) => Ok(true),
                    Err(password_hash::Error::Password) => Ok(false),
                    Err(e) => Err(PasswordHashError::UnexpectedError(e.to_string())),
                }
            })
        })
        .await
        .map_err(|e| PasswordHashError::UnexpectedError(e.to_string()))?
    }

    fn decoy_digest(&self) -> &PasswordDigest {
        &self.decoy
    }
}
