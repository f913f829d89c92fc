use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_EXTERNAL_ID_LENGTH: usize = 255;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Unknown provider: {0}")]
    Unknown(String),
    #[error("External id must not be empty")]
    EmptyExternalId,
    #[error("External id is too long")]
    ExternalIdTooLong,
}

/// Where an identity's credentials come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provider {
    Local,
    Google,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Local => "LOCAL",
            Provider::Google => "GOOGLE",
        }
    }

    pub fn is_external(self) -> bool {
        !matches!(self, Provider::Local)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOCAL" => Ok(Provider::Local),
            "GOOGLE" => Ok(Provider::Google),
            other => Err(ProviderError::Unknown(other.to_owned())),
        }
    }
}

/// Provider-issued stable subject identifier (Google's `sub` claim).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExternalId(String);

impl ExternalId {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, ProviderError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ProviderError::EmptyExternalId);
        }
        if trimmed.len() > MAX_EXTERNAL_ID_LENGTH {
            return Err(ProviderError::ExternalIdTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ExternalId {
    type Error = ProviderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ExternalId> for String {
    fn from(id: ExternalId) -> Self {
        id.0
    }
}
