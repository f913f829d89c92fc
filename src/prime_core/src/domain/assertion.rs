use crate::domain::{
    email::Email,
    provider::{ExternalId, Provider},
};

/// Identity claims extracted from a verified external provider assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalAssertion {
    pub provider: Provider,
    pub external_id: ExternalId,
    pub email: Email,
    pub name: Option<String>,
}
