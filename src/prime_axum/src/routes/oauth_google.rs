use axum::{Json, extract::State, extract::rejection::JsonRejection};
use prime_adapters::AuthApiError;
use prime_application::GoogleSignInUseCase;
use prime_core::AuthError;
use serde::Deserialize;

use super::{AuthResponse, payload};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GoogleSignInRequest {
    #[serde(rename = "externalAssertion", alias = "credential", alias = "idToken")]
    pub external_assertion: String,
}

#[tracing::instrument(name = "GoogleSignIn", skip(state, body))]
pub async fn oauth_google(
    State(state): State<AppState>,
    body: Result<Json<GoogleSignInRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AuthApiError> {
    let request = payload(body)?;
    let assertion = request.external_assertion.trim();
    if assertion.is_empty() {
        return Err(AuthError::Validation("externalAssertion must not be empty".into()).into());
    }

    let session = GoogleSignInUseCase::new(&*state.assertions, &*state.directory, &*state.tokens)
        .execute(assertion)
        .await?;

    Ok(Json(session.into()))
}
