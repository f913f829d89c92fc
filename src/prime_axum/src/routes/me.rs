use axum::Json;
use prime_core::Principal;

use crate::middleware::AuthenticatedPrincipal;

/// Echoes the principal carried by the caller's token.
pub async fn me(AuthenticatedPrincipal(principal): AuthenticatedPrincipal) -> Json<Principal> {
    Json(principal)
}
