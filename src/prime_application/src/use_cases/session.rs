use prime_core::{IssuedToken, Principal};

/// Outcome of every successful entry point: who the caller is and the token
/// they should present from now on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub principal: Principal,
    pub token: IssuedToken,
}
