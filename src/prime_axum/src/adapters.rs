//! Newtype wrapper letting access control read axum requests through
//! `prime_core::AuthRequest` without copying them.

use axum::extract::Request;
use prime_core::AuthRequest;

#[repr(transparent)]
pub struct AxumRequest(pub Request);

impl From<Request> for AxumRequest {
    fn from(req: Request) -> Self {
        AxumRequest(req)
    }
}

impl From<AxumRequest> for Request {
    fn from(wrapper: AxumRequest) -> Self {
        wrapper.0
    }
}

impl AuthRequest for AxumRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.0.headers().get(name)?.to_str().ok()
    }

    fn method(&self) -> &str {
        self.0.method().as_str()
    }

    fn path(&self) -> &str {
        self.0.uri().path()
    }
}
