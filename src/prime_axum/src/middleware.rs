use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use prime_adapters::AuthApiError;
use prime_application::AccessControlGate;
use prime_core::{AuthError, Principal};

use crate::adapters::AxumRequest;

/// Runs every request through the [`AccessControlGate`]. On success the
/// caller's [`Principal`], if any, is stored in the request extensions.
pub async fn access_control(
    State(gate): State<AccessControlGate>,
    request: Request,
    next: Next,
) -> Result<Response, AuthApiError> {
    let request = AxumRequest::from(request);
    let principal = gate.authorize(&request)?;

    let mut request = Request::from(request);
    if let Some(principal) = principal {
        request.extensions_mut().insert(principal);
    }

    Ok(next.run(request).await)
}

/// Extractor for the principal attached by [`access_control`].
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(pub Principal);

impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    S: Send + Sync,
{
    type Rejection = AuthApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthenticatedPrincipal)
            .ok_or_else(|| AuthApiError::from(AuthError::MissingToken))
    }
}
