use std::{sync::Arc, time::Duration};

use color_eyre::eyre::Result;
use prime_adapters::{
    Argon2PasswordHasher, GoogleIdTokenVerifier, HashMapUserDirectory, JwtTokenService,
    PostgresUserDirectory, SystemClock, UnverifiedClaimsDecoder,
    config::{AuthServiceSetting, PostgresSettings},
};
use prime_application::AccessControlGate;
use prime_axum::AppState;
use prime_core::{AssertionVerifier, RoutePolicy, TokenService, UserDirectory};
use secrecy::ExposeSecret;
use sqlx::{PgPool, postgres::PgPoolOptions};

const GOOGLE_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a PostgreSQL connection pool
pub async fn get_postgres_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(5).connect(url).await
}

/// Connect to PostgreSQL and run pending migrations.
pub async fn configure_postgresql(settings: &PostgresSettings) -> Result<PgPool, sqlx::Error> {
    let pg_pool = get_postgres_pool(settings.url.expose_secret()).await?;

    sqlx::migrate!().run(&pg_pool).await?;

    Ok(pg_pool)
}

/// Wire every collaborator from settings.
///
/// Without `postgres` settings identities live in memory and are lost on
/// restart.
pub async fn build_app_state(settings: &AuthServiceSetting, policy: RoutePolicy) -> Result<AppState> {
    let directory: Arc<dyn UserDirectory> = match &settings.postgres {
        Some(postgres) => Arc::new(PostgresUserDirectory::new(
            configure_postgresql(postgres).await?,
        )),
        None => {
            tracing::warn!("No postgres settings found, using the in-memory user directory");
            Arc::new(HashMapUserDirectory::new())
        }
    };

    let hasher = Arc::new(Argon2PasswordHasher::new(&settings.auth.password)?);

    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(
        &settings.auth.jwt,
        Arc::new(SystemClock),
    ));

    let assertions: Arc<dyn AssertionVerifier> = if settings.google.trust_unverified_claims {
        Arc::new(UnverifiedClaimsDecoder::new())
    } else {
        let http_client = reqwest::Client::builder()
            .timeout(GOOGLE_HTTP_TIMEOUT)
            .build()?;
        Arc::new(GoogleIdTokenVerifier::new(&settings.google, http_client)?)
    };

    let gate = AccessControlGate::new(policy, tokens.clone());

    Ok(AppState::new(directory, hasher, tokens, assertions, gate))
}
