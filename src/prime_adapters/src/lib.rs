pub mod clock;
pub mod config;
pub mod hashing;
pub mod http;
pub mod oauth;
pub mod persistence;
pub mod tokens;

pub use clock::SystemClock;
pub use hashing::Argon2PasswordHasher;
pub use http::error::{AuthApiError, ErrorResponse};
pub use oauth::{GoogleIdTokenVerifier, UnverifiedClaimsDecoder};
pub use persistence::{HashMapUserDirectory, PostgresUserDirectory};
pub use tokens::JwtTokenService;
