pub mod access_control;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

pub use access_control::AccessControlGate;
pub use use_cases::{
    authenticate::CredentialAuthenticator,
    google_sign_in::GoogleSignInUseCase,
    login::LoginUseCase,
    register::{RegisterUseCase, Registration},
    resolve_oauth::OAuthIdentityResolver,
    session::AuthSession,
};
