use std::sync::Arc;

use prime_core::{AccessLevel, AuthError, AuthRequest, Principal, RoutePolicy, TokenService};

/// Per-request authorization against a static [`RoutePolicy`].
///
/// Holds no session state; every request is classified on its own.
#[derive(Clone)]
pub struct AccessControlGate {
    policy: Arc<RoutePolicy>,
    tokens: Arc<dyn TokenService>,
}

impl AccessControlGate {
    pub fn new(policy: RoutePolicy, tokens: Arc<dyn TokenService>) -> Self {
        Self {
            policy: Arc::new(policy),
            tokens,
        }
    }

    pub fn policy(&self) -> &RoutePolicy {
        &self.policy
    }

    /// `Ok(None)` for public routes, `Ok(Some(principal))` when the caller
    /// holds a valid token with a sufficient role.
    pub fn authorize<R: AuthRequest + ?Sized>(
        &self,
        request: &R,
    ) -> Result<Option<Principal>, AuthError> {
        let level = self.policy.level_for(request.method(), request.path());

        if *level == AccessLevel::Public {
            return Ok(None);
        }

        let token = request.bearer_token().ok_or_else(|| {
            tracing::debug!(path = request.path(), "Missing bearer token");
            AuthError::MissingToken
        })?;

        let principal = self.tokens.verify(token).inspect_err(|e| {
            tracing::debug!(path = request.path(), error = %e, "Rejected bearer token");
        })?;

        if !level.admits(principal.role()) {
            tracing::warn!(
                path = request.path(),
                username = %principal.subject(),
                role = %principal.role(),
                "Role not permitted for route"
            );
            return Err(AuthError::InsufficientRole);
        }

        Ok(Some(principal))
    }
}
