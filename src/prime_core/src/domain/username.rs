use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_USERNAME_LENGTH: usize = 254;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,
    #[error("Username is too long")]
    TooLong,
    #[error("Username must not contain whitespace")]
    ContainsWhitespace,
}

/// Unique, immutable login name. Used as the token subject.
///
/// OAuth-provisioned identities use their email as the username, so the
/// length limit matches the email limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, UsernameError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UsernameError::Empty);
        }
        if trimmed.chars().count() > MAX_USERNAME_LENGTH {
            return Err(UsernameError::TooLong);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(UsernameError::ContainsWhitespace);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&crate::Email> for Username {
    fn from(email: &crate::Email) -> Self {
        Self(email.as_str().to_owned())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}
