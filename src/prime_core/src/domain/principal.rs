use serde::{Deserialize, Serialize};

use crate::domain::{role::Role, username::Username};

/// The authenticated caller attached to a request once access control passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    #[serde(rename = "username")]
    subject: Username,
    role: Role,
}

impl Principal {
    pub fn new(subject: Username, role: Role) -> Self {
        Self { subject, role }
    }

    pub fn subject(&self) -> &Username {
        &self.subject
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
