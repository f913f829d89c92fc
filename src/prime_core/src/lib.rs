pub mod domain;
pub mod error;
pub mod http_abstraction;
pub mod ports;
pub mod strategies;

pub use domain::{
    BearerToken, Email, EmailError, ExternalAssertion, ExternalId, Identity, IdentityError,
    IdentityId, IdentityParts, IssuedToken, Password, PasswordDigest, PasswordError, Principal,
    Provider, ProviderError, Role, RoleError, TokenError, Username, UsernameError,
};

pub use error::{AuthError, UniqueKey};

pub use ports::{
    repositories::{UserDirectory, UserDirectoryError},
    services::{
        AssertionError, AssertionVerifier, Clock, PasswordHashError, PasswordHasher, TokenService,
    },
};

pub use strategies::route_policy::{AccessLevel, RoutePattern, RoutePolicy, RouteRule};

pub use http_abstraction::AuthRequest;
