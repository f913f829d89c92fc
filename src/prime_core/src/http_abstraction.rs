//! Framework-neutral view of an incoming HTTP request.
//!
//! Web frameworks implement [`AuthRequest`] on a newtype around their own
//! request type so access control can run without copying the request:
//!
//! ```ignore
//! pub struct AxumRequest<'a>(pub &'a axum::extract::Request);
//!
//! impl AuthRequest for AxumRequest<'_> {
//!     fn header(&self, name: &str) -> Option<&str> {
//!         self.0.headers().get(name)?.to_str().ok()
//!     }
//!     fn method(&self) -> &str {
//!         self.0.method().as_str()
//!     }
//!     fn path(&self) -> &str {
//!         self.0.uri().path()
//!     }
//! }
//! ```

const BEARER_PREFIX: &str = "bearer ";

pub trait AuthRequest {
    /// Header lookup is case-insensitive. Returns `None` if the header is
    /// missing or not valid UTF-8.
    fn header(&self, name: &str) -> Option<&str>;

    fn method(&self) -> &str;

    fn path(&self) -> &str;

    /// Token from `Authorization: Bearer <token>`. The scheme is matched
    /// case-insensitively; an empty token counts as absent.
    fn bearer_token(&self) -> Option<&str> {
        let value = self.header("authorization")?.trim();
        let prefix = value.get(..BEARER_PREFIX.len())?;
        if !prefix.eq_ignore_ascii_case(BEARER_PREFIX) {
            return None;
        }
        let token = value[BEARER_PREFIX.len()..].trim();
        (!token.is_empty()).then_some(token)
    }
}
