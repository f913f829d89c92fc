use prime_core::{
    Email, ExternalId, Identity, IdentityId, IdentityParts, PasswordDigest, Provider, Role,
    UniqueKey, UserDirectory, UserDirectoryError, Username,
};
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";
const PROVIDER_EXTERNAL_ID_CONSTRAINT: &str = "users_provider_external_id_key";

const SELECT_COLUMNS: &str =
    "SELECT id, username, email, password_hash, role, provider, external_id, name FROM users";

pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        clause: &str,
        binds: &[&str],
    ) -> Result<Option<Identity>, UserDirectoryError> {
        let sql = format!("{SELECT_COLUMNS} WHERE {clause}");
        let mut query = sqlx::query(&sql);
        for bind in binds {
            query = query.bind(*bind);
        }

        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        row.map(|row| identity_from_row(&row)).transpose()
    }
}

#[async_trait::async_trait]
impl UserDirectory for PostgresUserDirectory {
    #[tracing::instrument(name = "Finding identity by username in PostgreSQL", skip_all)]
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, UserDirectoryError> {
        self.fetch_one_where("username = $1", &[username.as_str()])
            .await
    }

    #[tracing::instrument(name = "Finding identity by email in PostgreSQL", skip_all)]
    async fn find_by_email(&self, email: &Email) -> Result<Option<Identity>, UserDirectoryError> {
        self.fetch_one_where("email = $1", &[email.as_str()]).await
    }

    #[tracing::instrument(name = "Finding identity by external id in PostgreSQL", skip_all)]
    async fn find_by_provider_id(
        &self,
        provider: Provider,
        external_id: &ExternalId,
    ) -> Result<Option<Identity>, UserDirectoryError> {
        self.fetch_one_where(
            "provider = $1 AND external_id = $2",
            &[provider.as_str(), external_id.as_str()],
        )
        .await
    }

    #[tracing::instrument(name = "Saving identity to PostgreSQL", skip_all)]
    async fn save(&self, identity: Identity) -> Result<Identity, UserDirectoryError> {
        let query = sqlx::query(
            r#"
                INSERT INTO users
                    (id, username, email, password_hash, role, provider, external_id, name)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (id) DO UPDATE
                SET provider = EXCLUDED.provider,
                    external_id = EXCLUDED.external_id
                WHERE users.external_id IS NULL
                   OR (users.provider = EXCLUDED.provider
                       AND users.external_id = EXCLUDED.external_id)
            "#,
        )
        .bind(identity.id().as_uuid())
        .bind(identity.username().as_str())
        .bind(identity.email().as_str())
        .bind(
            identity
                .password_hash()
                .map(|digest| digest.as_ref().expose_secret().as_str()),
        )
        .bind(identity.role().as_str())
        .bind(identity.provider().as_str())
        .bind(identity.external_id().map(ExternalId::as_str))
        .bind(identity.name());

        let result = query.execute(&self.pool).await.map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                match db_err.constraint() {
                    Some(USERNAME_CONSTRAINT) => {
                        return UserDirectoryError::UniqueViolation(UniqueKey::Username);
                    }
                    Some(EMAIL_CONSTRAINT) => {
                        return UserDirectoryError::UniqueViolation(UniqueKey::Email);
                    }
                    Some(PROVIDER_EXTERNAL_ID_CONSTRAINT) => {
                        return UserDirectoryError::UniqueViolation(
                            UniqueKey::ProviderExternalId,
                        );
                    }
                    _ => {}
                }
            }
            UserDirectoryError::UnexpectedError(e.to_string())
        })?;

        // The row exists but already carries a different link.
        if result.rows_affected() == 0 {
            return Err(UserDirectoryError::UniqueViolation(
                UniqueKey::ProviderExternalId,
            ));
        }

        Ok(identity)
    }
}

fn identity_from_row(row: &PgRow) -> Result<Identity, UserDirectoryError> {
    let id: Uuid = row.try_get("id").map_err(unexpected)?;
    let username: String = row.try_get("username").map_err(unexpected)?;
    let email: String = row.try_get("email").map_err(unexpected)?;
    let password_hash: Option<String> = row.try_get("password_hash").map_err(unexpected)?;
    let role: String = row.try_get("role").map_err(unexpected)?;
    let provider: String = row.try_get("provider").map_err(unexpected)?;
    let external_id: Option<String> = row.try_get("external_id").map_err(unexpected)?;
    let name: Option<String> = row.try_get("name").map_err(unexpected)?;

    let parts = IdentityParts {
        id: IdentityId::from(id),
        username: Username::parse(username).map_err(unexpected)?,
        email: Email::parse(email).map_err(unexpected)?,
        password_hash: password_hash.map(|hash| PasswordDigest::new(Secret::from(hash))),
        role: role.parse::<Role>().map_err(unexpected)?,
        provider: provider.parse::<Provider>().map_err(unexpected)?,
        external_id: external_id
            .map(ExternalId::parse)
            .transpose()
            .map_err(unexpected)?,
        name,
    };

    Identity::restore(parts).map_err(unexpected)
}

fn unexpected(e: impl std::fmt::Display) -> UserDirectoryError {
    UserDirectoryError::UnexpectedError(e.to_string())
}
