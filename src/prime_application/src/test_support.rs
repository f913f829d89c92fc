use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use prime_core::{
    BearerToken, Email, ExternalId, Identity, IssuedToken, Password, PasswordDigest,
    PasswordHashError, PasswordHasher, Principal, Provider, Role, TokenError, TokenService,
    UniqueKey, UserDirectory, UserDirectoryError, Username,
};
use secrecy::{ExposeSecret, Secret};

pub const DECOY: &str = "decoy-password-that-nobody-has";

pub fn password(raw: &str) -> Password {
    Password::parse(Secret::from(raw.to_owned())).unwrap()
}

pub fn local_identity(username: &str, email: &str, pw: &str, role: Role) -> Identity {
    Identity::register_local(
        Username::parse(username).unwrap(),
        Email::parse(email).unwrap(),
        PasswordDigest::new(Secret::from(format!("plain:{pw}"))),
        role,
        None,
    )
}

pub fn google_identity(external_id: &str, email: &str) -> Identity {
    Identity::provision_external(
        Provider::Google,
        ExternalId::parse(external_id).unwrap(),
        Email::parse(email).unwrap(),
        None,
    )
    .unwrap()
}

/// Directory enforcing the same uniqueness rules a database would.
#[derive(Default)]
pub struct InMemoryDirectory {
    identities: Mutex<Vec<Identity>>,
}

impl InMemoryDirectory {
    pub fn with(identities: impl IntoIterator<Item = Identity>) -> Self {
        Self {
            identities: Mutex::new(identities.into_iter().collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.identities.lock().unwrap().len()
    }

    pub fn snapshot(&self) -> Vec<Identity> {
        self.identities.lock().unwrap().clone()
    }

    pub fn insert(&self, identity: Identity) -> Result<Identity, UserDirectoryError> {
        let mut identities = self.identities.lock().unwrap();

        for other in identities.iter().filter(|i| i.id() != identity.id()) {
            if other.username() == identity.username() {
                return Err(UserDirectoryError::UniqueViolation(UniqueKey::Username));
            }
            if other.email() == identity.email() {
                return Err(UserDirectoryError::UniqueViolation(UniqueKey::Email));
            }
            if identity.external_id().is_some()
                && other.provider() == identity.provider()
                && other.external_id() == identity.external_id()
            {
                return Err(UserDirectoryError::UniqueViolation(
                    UniqueKey::ProviderExternalId,
                ));
            }
        }

        if let Some(stored) = identities.iter().find(|i| i.id() == identity.id()) {
            if stored.external_id().is_some()
                && (stored.provider() != identity.provider()
                    || stored.external_id() != identity.external_id())
            {
                return Err(UserDirectoryError::UniqueViolation(
                    UniqueKey::ProviderExternalId,
                ));
            }
        }

        identities.retain(|i| i.id() != identity.id());
        identities.push(identity.clone());
        Ok(identity)
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, UserDirectoryError> {
        let identities = self.identities.lock().unwrap();
        Ok(identities.iter().find(|i| i.username() == username).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Identity>, UserDirectoryError> {
        let identities = self.identities.lock().unwrap();
        Ok(identities.iter().find(|i| i.email() == email).cloned())
    }

    async fn find_by_provider_id(
        &self,
        provider: Provider,
        external_id: &ExternalId,
    ) -> Result<Option<Identity>, UserDirectoryError> {
        let identities = self.identities.lock().unwrap();
        Ok(identities
            .iter()
            .find(|i| i.provider() == provider && i.external_id() == Some(external_id))
            .cloned())
    }

    async fn save(&self, identity: Identity) -> Result<Identity, UserDirectoryError> {
        self.insert(identity)
    }
}

/// Stores passwords as `plain:<password>` and counts verifications.
pub struct PlainHasher {
    decoy: PasswordDigest,
    verifications: AtomicUsize,
}

impl Default for PlainHasher {
    fn default() -> Self {
        Self {
            decoy: PasswordDigest::new(Secret::from(format!("plain:{DECOY}"))),
            verifications: AtomicUsize::new(0),
        }
    }
}

impl PlainHasher {
    pub fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError> {
        Ok(PasswordDigest::new(Secret::from(format!(
            "plain:{}",
            password.as_ref().expose_secret()
        ))))
    }

    async fn verify(
        &self,
        password: &Password,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError> {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        if !digest.as_ref().expose_secret().starts_with("plain:") {
            return Err(PasswordHashError::MalformedDigest);
        }
        let expected = format!("plain:{}", password.as_ref().expose_secret());
        Ok(digest.as_ref().expose_secret() == &expected)
    }

    fn decoy_digest(&self) -> &PasswordDigest {
        &self.decoy
    }
}

/// Tokens of the form `<username>|<ROLE>`, never expiring.
pub struct FakeTokens;

impl TokenService for FakeTokens {
    fn issue(&self, principal: &Principal, ttl: Duration) -> Result<IssuedToken, TokenError> {
        let issued_at = Utc::now();
        Ok(IssuedToken {
            token: BearerToken::new(format!(
                "{}|{}",
                principal.subject(),
                principal.role()
            )),
            issued_at,
            expires_at: issued_at + ttl,
        })
    }

    fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let (subject, role) = token.split_once('|').ok_or(TokenError::Malformed)?;
        let subject = Username::parse(subject).map_err(|_| TokenError::Malformed)?;
        let role: Role = role.parse().map_err(|_| TokenError::Invalid)?;
        Ok(Principal::new(subject, role))
    }

    fn default_ttl(&self) -> Duration {
        Duration::hours(1)
    }
}
