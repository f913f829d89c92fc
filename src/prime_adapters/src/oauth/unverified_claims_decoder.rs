use jsonwebtoken::dangerous::insecure_decode;
use prime_core::{AssertionError, AssertionVerifier, ExternalAssertion};

use crate::oauth::google_id_token_verifier::GoogleClaims;

/// Reads Google ID token claims WITHOUT checking the signature, audience,
/// issuer or expiry.
///
/// Anyone can mint an assertion this decoder accepts. It exists only to
/// reproduce legacy sign-in behavior and is selected by
/// `google.trust_unverified_claims`.
pub struct UnverifiedClaimsDecoder;

impl Default for UnverifiedClaimsDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl UnverifiedClaimsDecoder {
    pub fn new() -> Self {
        tracing::warn!("Google sign-in is trusting unverified ID token claims");
        Self
    }
}

#[async_trait::async_trait]
impl AssertionVerifier for UnverifiedClaimsDecoder {
    #[tracing::instrument(name = "UnverifiedClaimsDecoder::verify", skip_all)]
    async fn verify(&self, assertion: &str) -> Result<ExternalAssertion, AssertionError> {
        tracing::warn!("Accepting external assertion without signature verification");

        insecure_decode::<GoogleClaims>(assertion)
            .map_err(|e| AssertionError::Unverified(e.to_string()))?
            .claims
            .into_assertion()
    }
}
