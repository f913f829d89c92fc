use std::str::FromStr;

use axum::http::HeaderValue;
use config::{Config, Environment, File};
use jsonwebtoken::Algorithm;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use thiserror::Error;

use crate::config::constants::{
    DEFAULT_CONFIG_FILE, LOCAL_CONFIG_FILE, MAX_TOKEN_TTL_SECONDS, MIN_JWT_SECRET_BYTES, env,
    google, prod,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthServiceSetting {
    pub application: ApplicationSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub google: GoogleSettings,
    #[serde(default)]
    pub postgres: Option<PostgresSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt: JwtSettings,
    #[serde(default)]
    pub allowed_origins: AllowedOrigins,
    #[serde(default)]
    pub password: PasswordSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: Secret<String>,
    pub ttl_seconds: i64,
    #[serde(default)]
    pub clock_skew_seconds: i64,
}

impl JwtSettings {
    pub fn as_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PasswordSettings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self {
            memory_kib: prod::password::MEMORY_KIB,
            iterations: prod::password::ITERATIONS,
            parallelism: prod::password::PARALLELISM,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// OAuth client id; tokens must carry it as `aud`.
    pub client_id: String,
    pub jwks_url: String,
    pub issuers: Vec<String>,
    pub algorithms: Vec<String>,
    /// Accept assertions without checking their signature. Compatibility only.
    pub trust_unverified_claims: bool,
    /// Minimum gap between two fetches of the signing keys.
    pub jwks_min_refresh_seconds: u64,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            jwks_url: google::JWKS_URL.to_owned(),
            issuers: google::ISSUERS.iter().map(|s| (*s).to_owned()).collect(),
            algorithms: vec![google::ALGORITHM.to_owned()],
            trust_unverified_claims: false,
            jwks_min_refresh_seconds: google::JWKS_MIN_REFRESH_SECONDS,
        }
    }
}

impl GoogleSettings {
    pub fn parsed_algorithms(&self) -> Result<Vec<Algorithm>, ConfigError> {
        self.algorithms
            .iter()
            .map(|alg| {
                Algorithm::from_str(alg)
                    .map_err(|_| ConfigError::Invalid(format!("Unknown JWT algorithm {alg}")))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
}

/// CORS origins permitted to call the service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct AllowedOrigins(Vec<HeaderValue>);

impl AllowedOrigins {
    pub fn new(origins: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Self(
            origins
                .into_iter()
                .filter_map(|origin| HeaderValue::from_str(origin.as_ref().trim()).ok())
                .collect(),
        )
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.iter().any(|allowed| allowed == origin)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for AllowedOrigins {
    fn from(origins: Vec<String>) -> Self {
        Self::new(origins)
    }
}

impl AuthServiceSetting {
    /// Layered load: built-in defaults, `config/default.*`, `config/local.*`,
    /// `PRIME__*` environment variables, then `JWT_SECRET` / `DATABASE_URL`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settings: Self = Config::builder()
            .set_default("application.address", prod::APP_ADDRESS)?
            .set_default("auth.jwt.ttl_seconds", prod::TOKEN_TTL_SECONDS)?
            .set_default("auth.jwt.clock_skew_seconds", 0)?
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false))
            .add_source(File::with_name(LOCAL_CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(env::ENV_PREFIX)
                    .separator(env::ENV_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key("auth.allowed_origins")
                    .with_list_parse_key("google.issuers")
                    .with_list_parse_key("google.algorithms")
                    .try_parsing(true),
            )
            .set_override_option("auth.jwt.secret", std::env::var(env::JWT_SECRET_ENV_VAR).ok())?
            .set_override_option("postgres.url", std::env::var(env::DATABASE_URL_ENV_VAR).ok())?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt.as_bytes().len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::Invalid(format!(
                "JWT secret must be at least {MIN_JWT_SECRET_BYTES} bytes"
            )));
        }
        if self.auth.jwt.ttl_seconds <= 0 {
            return Err(ConfigError::Invalid("Token TTL must be positive".to_owned()));
        }
        if self.auth.jwt.ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(ConfigError::Invalid(format!(
                "Token TTL must not exceed {MAX_TOKEN_TTL_SECONDS} seconds"
            )));
        }
        if !(0..=MAX_TOKEN_TTL_SECONDS).contains(&self.auth.jwt.clock_skew_seconds) {
            return Err(ConfigError::Invalid(format!(
                "Clock skew must be between 0 and {MAX_TOKEN_TTL_SECONDS} seconds"
            )));
        }
        if self.google.issuers.is_empty() {
            return Err(ConfigError::Invalid(
                "At least one Google issuer is required".to_owned(),
            ));
        }
        self.google.parsed_algorithms()?;
        Ok(())
    }
}
