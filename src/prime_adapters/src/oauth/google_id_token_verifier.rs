use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use arc_swap::ArcSwap;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header, jwk::JwkSet};
use prime_core::{
    AssertionError, AssertionVerifier, Email, ExternalAssertion, ExternalId, Provider,
};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::{ConfigError, GoogleSettings};

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleClaims {
    pub sub: String,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub name: Option<String>,
}

impl GoogleClaims {
    pub(crate) fn into_assertion(self) -> Result<ExternalAssertion, AssertionError> {
        if self.email_verified == Some(false) {
            return Err(AssertionError::Unverified("Email is not verified".to_owned()));
        }

        let email = self
            .email
            .ok_or_else(|| AssertionError::Unverified("Missing email claim".to_owned()))?;

        Ok(ExternalAssertion {
            provider: Provider::Google,
            external_id: ExternalId::parse(&self.sub)
                .map_err(|e| AssertionError::Unverified(e.to_string()))?,
            email: Email::parse(email).map_err(|e| AssertionError::Unverified(e.to_string()))?,
            name: self.name.filter(|n| !n.trim().is_empty()),
        })
    }
}

/// Signing keys as of the last successful fetch.
#[derive(Default)]
struct KeyCache {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Option<Instant>,
}

impl KeyCache {
    fn is_fresh(&self, min_refresh: Duration) -> bool {
        self.fetched_at
            .is_some_and(|fetched_at| fetched_at.elapsed() < min_refresh)
    }
}

/// Verifies Google ID tokens against Google's published signing keys.
///
/// Keys are cached by `kid`; an unknown `kid` triggers one refetch of the
/// key set, which covers Google's key rotation. Refetches are at most one
/// per `min_refresh`, so unknown `kid`s inside that window fail without
/// leaving the process.
pub struct GoogleIdTokenVerifier {
    http_client: reqwest::Client,
    jwks_url: String,
    client_id: String,
    issuers: Vec<String>,
    algorithms: Vec<Algorithm>,
    keys: ArcSwap<KeyCache>,
    min_refresh: Duration,
    refresh_lock: Mutex<()>,
}

impl GoogleIdTokenVerifier {
    pub fn new(settings: &GoogleSettings, http_client: reqwest::Client) -> Result<Self, ConfigError> {
        if settings.client_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "google.client_id is required to verify Google sign-ins".to_owned(),
            ));
        }

        Ok(Self {
            http_client,
            jwks_url: settings.jwks_url.clone(),
            client_id: settings.client_id.clone(),
            issuers: settings.issuers.clone(),
            algorithms: settings.parsed_algorithms()?,
            keys: ArcSwap::from_pointee(KeyCache::default()),
            min_refresh: Duration::from_secs(settings.jwks_min_refresh_seconds),
            refresh_lock: Mutex::new(()),
        })
    }

    async fn key_for(&self, kid: &str) -> Result<DecodingKey, AssertionError> {
        let unknown = || AssertionError::Unverified(format!("Unknown signing key {kid}"));

        let cache = self.keys.load();
        if let Some(key) = cache.keys.get(kid) {
            return Ok(key.clone());
        }
        if cache.is_fresh(self.min_refresh) {
            tracing::debug!(kid, "Unknown signing key within the refresh window");
            return Err(unknown());
        }
        drop(cache);

        let _guard = self.refresh_lock.lock().await;

        // Another request may have refreshed while we waited.
        let cache = self.keys.load();
        if let Some(key) = cache.keys.get(kid) {
            return Ok(key.clone());
        }
        if cache.is_fresh(self.min_refresh) {
            return Err(unknown());
        }
        drop(cache);

        self.refresh_keys().await?;

        self.keys.load().keys.get(kid).cloned().ok_or_else(unknown)
    }

    #[tracing::instrument(name = "Fetching Google signing keys", skip(self))]
    async fn refresh_keys(&self) -> Result<(), AssertionError> {
        let jwks: JwkSet = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AssertionError::UnexpectedError(e.to_string()))?
            .json()
            .await
            .map_err(|e| AssertionError::UnexpectedError(e.to_string()))?;

        let keys: HashMap<String, DecodingKey> = jwks
            .keys
            .iter()
            .filter_map(|jwk| {
                let kid = jwk.common.key_id.clone()?;
                match DecodingKey::from_jwk(jwk) {
                    Ok(key) => Some((kid, key)),
                    Err(e) => {
                        tracing::warn!(kid, error = %e, "Skipping unusable signing key");
                        None
                    }
                }
            })
            .collect();

        tracing::debug!(count = keys.len(), "Loaded Google signing keys");
        self.keys.store(Arc::new(KeyCache {
            keys,
            fetched_at: Some(Instant::now()),
        }));
        Ok(())
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.set_audience(&[&self.client_id]);
        validation.set_issuer(self.issuers.as_slice());
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation
    }
}

#[async_trait::async_trait]
impl AssertionVerifier for GoogleIdTokenVerifier {
    #[tracing::instrument(name = "GoogleIdTokenVerifier::verify", skip_all)]
    async fn verify(&self, assertion: &str) -> Result<ExternalAssertion, AssertionError> {
        let header = decode_header(assertion)
            .map_err(|e| AssertionError::Unverified(e.to_string()))?;

        if !self.algorithms.contains(&header.alg) {
            return Err(AssertionError::Unverified(format!(
                "Algorithm {:?} is not accepted",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AssertionError::Unverified("Missing key id".to_owned()))?;
        let key = self.key_for(&kid).await?;

        let claims = decode::<GoogleClaims>(assertion, &key, &self.validation(header.alg))
            .map_err(|e| AssertionError::Unverified(e.to_string()))?
            .claims;

        claims.into_assertion()
    }
}
