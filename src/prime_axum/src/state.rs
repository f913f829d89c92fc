use std::sync::Arc;

use prime_application::AccessControlGate;
use prime_core::{AssertionVerifier, PasswordHasher, TokenService, UserDirectory};

/// Shared collaborators handed to every route. Cloning only bumps refcounts.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn UserDirectory>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenService>,
    pub assertions: Arc<dyn AssertionVerifier>,
    pub gate: AccessControlGate,
}

impl AppState {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
        assertions: Arc<dyn AssertionVerifier>,
        gate: AccessControlGate,
    ) -> Self {
        Self {
            directory,
            hasher,
            tokens,
            assertions,
            gate,
        }
    }
}
