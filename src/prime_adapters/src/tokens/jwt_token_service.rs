use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, dangerous::insecure_decode, decode,
    decode_header, encode,
};
use prime_core::{
    BearerToken, Clock, IssuedToken, Principal, Role, TokenError, TokenService, Username,
};
use serde::{Deserialize, Serialize};

use crate::config::{JwtSettings, constants::MAX_TOKEN_TTL_SECONDS};

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// HS256 bearer tokens carrying `{sub, role, iat, exp}`.
///
/// Expiry is judged against the injected [`Clock`], not the library's own
/// notion of time, with an optional skew allowance.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    clock_skew: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    pub fn new(settings: &JwtSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.as_bytes()),
            // Bounded so unvalidated settings cannot overflow `exp`.
            ttl: Duration::seconds(settings.ttl_seconds.clamp(1, MAX_TOKEN_TTL_SECONDS)),
            clock_skew: Duration::seconds(
                settings.clock_skew_seconds.clamp(0, MAX_TOKEN_TTL_SECONDS),
            ),
            clock,
        }
    }

    /// Parses header and payload without looking at the signature, so a
    /// damaged signature segment is never mistaken for a malformed token.
    fn parse_unverified(token: &str) -> Result<Claims, TokenError> {
        let mut segments = token.splitn(3, '.');
        let (Some(header), Some(payload), Some(_signature)) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(TokenError::Malformed);
        };
        let unsigned = format!("{header}.{payload}.");

        let header = decode_header(&unsigned).map_err(|_| TokenError::Malformed)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::Invalid);
        }

        insecure_decode::<Claims>(&unsigned)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Malformed)
    }

    fn verify_signature(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

impl TokenService for JwtTokenService {
    #[tracing::instrument(
        name = "JwtTokenService::issue",
        skip_all,
        fields(username = %principal.subject())
    )]
    fn issue(&self, principal: &Principal, ttl: Duration) -> Result<IssuedToken, TokenError> {
        let issued_at = truncate_to_seconds(self.clock.now());
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Issue("Duration out of range".to_owned()))?;

        let claims = Claims {
            sub: principal.subject().as_str().to_owned(),
            role: principal.role(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Issue(e.to_string()))?;

        Ok(IssuedToken {
            token: BearerToken::new(token),
            issued_at,
            expires_at,
        })
    }

    fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        Self::parse_unverified(token)?;
        let claims = self.verify_signature(token)?;

        let now = self.clock.now().timestamp();
        if now > claims.exp.saturating_add(self.clock_skew.num_seconds()) {
            return Err(TokenError::Expired);
        }

        let subject = Username::parse(&claims.sub).map_err(|_| TokenError::Malformed)?;
        Ok(Principal::new(subject, claims.role))
    }

    fn default_ttl(&self) -> Duration {
        self.ttl
    }
}

fn truncate_to_seconds(instant: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(instant.timestamp(), 0).unwrap_or(instant)
}
