use prime_core::{
    AuthError, Email, Identity, Password, PasswordHasher, Role, TokenService, UniqueKey,
    UserDirectory, Username,
};

use crate::use_cases::session::AuthSession;

/// Validated self-service registration input.
#[derive(Debug)]
pub struct Registration {
    /// Defaults to the email when absent.
    pub username: Option<Username>,
    pub email: Email,
    pub password: Password,
    /// Defaults to `CUSTOMER` when absent.
    pub role: Option<Role>,
    pub name: Option<String>,
}

pub struct RegisterUseCase<'a, U: ?Sized, H: ?Sized, T: ?Sized> {
    directory: &'a U,
    hasher: &'a H,
    tokens: &'a T,
}

impl<'a, U, H, T> RegisterUseCase<'a, U, H, T>
where
    U: UserDirectory + ?Sized,
    H: PasswordHasher + ?Sized,
    T: TokenService + ?Sized,
{
    pub fn new(directory: &'a U, hasher: &'a H, tokens: &'a T) -> Self {
        Self {
            directory,
            hasher,
            tokens,
        }
    }

    /// Create a local identity and sign it in.
    ///
    /// Only `CUSTOMER` and `DEVELOPER` can be chosen here. A taken username or
    /// email is reported as [`AuthError::DuplicateIdentity`] and nothing is
    /// written.
    #[tracing::instrument(
        name = "RegisterUseCase::execute",
        skip(self, registration),
        fields(email = %registration.email)
    )]
    pub async fn execute(&self, registration: Registration) -> Result<AuthSession, AuthError> {
        let Registration {
            username,
            email,
            password,
            role,
            name,
        } = registration;

        let role = role.unwrap_or_default();
        if !role.is_self_assignable() {
            return Err(AuthError::Validation(format!(
                "Role {role} cannot be chosen at registration"
            )));
        }

        // External sign-ins are provisioned under their email, so an email
        // can only be claimed as a username by its owner.
        if let Some(claimed) = username.as_ref().and_then(|u| Email::parse(u.as_str()).ok()) {
            if claimed != email {
                return Err(AuthError::Validation(
                    "Username must not be a different email address".to_owned(),
                ));
            }
        }

        let username = username.unwrap_or_else(|| Username::from(&email));

        if self.directory.exists_by_username(&username).await? {
            return Err(AuthError::DuplicateIdentity(UniqueKey::Username));
        }
        if self.directory.exists_by_email(&email).await? {
            return Err(AuthError::DuplicateIdentity(UniqueKey::Email));
        }

        let digest = self.hasher.hash(&password).await?;
        let identity = Identity::register_local(username, email, digest, role, name);

        // The unique constraints still decide races between concurrent registrations.
        let identity = self.directory.save(identity).await?;
        let principal = identity.principal();
        let token = self.tokens.issue(&principal, self.tokens.default_ttl())?;

        tracing::info!(username = %principal.subject(), role = %principal.role(), "Registered identity");

        Ok(AuthSession { principal, token })
    }
}
