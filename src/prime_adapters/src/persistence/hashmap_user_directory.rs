use std::{collections::HashMap, sync::Arc};

use prime_core::{
    Email, ExternalId, Identity, IdentityId, Provider, UniqueKey, UserDirectory,
    UserDirectoryError, Username,
};
use tokio::sync::RwLock;

#[derive(Default)]
struct Indexes {
    by_id: HashMap<IdentityId, Identity>,
    by_username: HashMap<Username, IdentityId>,
    by_email: HashMap<Email, IdentityId>,
    by_external: HashMap<(Provider, ExternalId), IdentityId>,
}

impl Indexes {
    fn conflict(&self, identity: &Identity) -> Option<UniqueKey> {
        let taken_by_other = |owner: Option<&IdentityId>| owner.is_some_and(|id| *id != identity.id());

        if taken_by_other(self.by_username.get(identity.username())) {
            return Some(UniqueKey::Username);
        }
        if taken_by_other(self.by_email.get(identity.email())) {
            return Some(UniqueKey::Email);
        }
        if let Some(external_id) = identity.external_id() {
            let key = (identity.provider(), external_id.clone());
            if taken_by_other(self.by_external.get(&key)) {
                return Some(UniqueKey::ProviderExternalId);
            }
        }
        // A stored link is never replaced, even by a stale copy of the same row.
        let stored_link = self
            .by_id
            .get(&identity.id())
            .and_then(|stored| stored.external_id().map(|ext| (stored.provider(), ext)));
        if let Some((provider, external_id)) = stored_link {
            if identity.provider() != provider || identity.external_id() != Some(external_id) {
                return Some(UniqueKey::ProviderExternalId);
            }
        }
        None
    }

    fn unindex(&mut self, id: IdentityId) {
        if let Some(old) = self.by_id.remove(&id) {
            self.by_username.remove(old.username());
            self.by_email.remove(old.email());
            if let Some(external_id) = old.external_id() {
                self.by_external
                    .remove(&(old.provider(), external_id.clone()));
            }
        }
    }

    fn index(&mut self, identity: Identity) {
        let id = identity.id();
        self.by_username.insert(identity.username().clone(), id);
        self.by_email.insert(identity.email().clone(), id);
        if let Some(external_id) = identity.external_id() {
            self.by_external
                .insert((identity.provider(), external_id.clone()), id);
        }
        self.by_id.insert(id, identity);
    }
}

/// In-memory directory. Uniqueness checks and the write happen under one
/// write lock, so concurrent saves behave like a database unique index.
#[derive(Default, Clone)]
pub struct HashMapUserDirectory {
    indexes: Arc<RwLock<Indexes>>,
}

impl HashMapUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.indexes.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl UserDirectory for HashMapUserDirectory {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, UserDirectoryError> {
        let indexes = self.indexes.read().await;
        Ok(indexes
            .by_username
            .get(username)
            .and_then(|id| indexes.by_id.get(id))
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Identity>, UserDirectoryError> {
        let indexes = self.indexes.read().await;
        Ok(indexes
            .by_email
            .get(email)
            .and_then(|id| indexes.by_id.get(id))
            .cloned())
    }

    async fn find_by_provider_id(
        &self,
        provider: Provider,
        external_id: &ExternalId,
    ) -> Result<Option<Identity>, UserDirectoryError> {
        let indexes = self.indexes.read().await;
        Ok(indexes
            .by_external
            .get(&(provider, external_id.clone()))
            .and_then(|id| indexes.by_id.get(id))
            .cloned())
    }

    async fn save(&self, identity: Identity) -> Result<Identity, UserDirectoryError> {
        let mut indexes = self.indexes.write().await;

        if let Some(key) = indexes.conflict(&identity) {
            return Err(UserDirectoryError::UniqueViolation(key));
        }

        indexes.unindex(identity.id());
        indexes.index(identity.clone());
        Ok(identity)
    }
}
