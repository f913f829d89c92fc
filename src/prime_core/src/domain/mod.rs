pub mod assertion;
pub mod email;
pub mod identity;
pub mod password;
pub mod principal;
pub mod provider;
pub mod role;
pub mod token;
pub mod username;

pub use assertion::ExternalAssertion;
pub use email::{Email, EmailError};
pub use identity::{Identity, IdentityError, IdentityId, IdentityParts};
pub use password::{Password, PasswordDigest, PasswordError};
pub use principal::Principal;
pub use provider::{ExternalId, Provider, ProviderError};
pub use role::{Role, RoleError};
pub use token::{BearerToken, IssuedToken, TokenError};
pub use username::{Username, UsernameError};
