use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use prime_core::{AuthError, TokenError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// HTTP face of [`AuthError`].
///
/// Credential and token failures share one generic message; the `code`
/// field carries the machine-readable reason. 500s never expose detail.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct AuthApiError(#[from] AuthError);

impl AuthApiError {
    pub fn inner(&self) -> &AuthError {
        &self.0
    }

    fn parts(&self) -> (StatusCode, &'static str, String) {
        const UNAUTHORIZED: &str = "Authentication failed";

        match &self.0 {
            AuthError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AuthError::DuplicateIdentity(_) => (
                StatusCode::BAD_REQUEST,
                "DUPLICATE_IDENTITY",
                self.0.to_string(),
            ),
            AuthError::UsernameUnavailable(_) => (
                StatusCode::CONFLICT,
                "USERNAME_UNAVAILABLE",
                "An account with this username already exists".to_owned(),
            ),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid credentials".to_owned(),
            ),
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "MISSING_TOKEN",
                UNAUTHORIZED.to_owned(),
            ),
            AuthError::Token(TokenError::Malformed) => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_MALFORMED",
                UNAUTHORIZED.to_owned(),
            ),
            AuthError::Token(TokenError::Invalid) => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_INVALID",
                UNAUTHORIZED.to_owned(),
            ),
            AuthError::Token(TokenError::Expired) => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_EXPIRED",
                UNAUTHORIZED.to_owned(),
            ),
            AuthError::UpstreamAssertionUnverified => (
                StatusCode::UNAUTHORIZED,
                "ASSERTION_UNVERIFIED",
                UNAUTHORIZED.to_owned(),
            ),
            AuthError::InsufficientRole => (
                StatusCode::FORBIDDEN,
                "INSUFFICIENT_ROLE",
                "Access denied".to_owned(),
            ),
            AuthError::Token(TokenError::Issue(_)) | AuthError::Unexpected(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_owned(),
            ),
        }
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.parts();

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed unexpectedly");
        }

        let body = Json(ErrorResponse {
            error,
            code: code.to_owned(),
        });

        (status, body).into_response()
    }
}
