//! Static route table deciding what each request needs before it is served.
//!
//! Patterns are `/`-separated segments where:
//! - a literal segment must match exactly,
//! - `*` or `{name}` matches exactly one segment,
//! - a trailing `**` matches zero or more remaining segments.
//!
//! Rules are evaluated in order and the first match wins. Requests that match
//! no rule fall back to the policy's default level.

use crate::domain::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessLevel {
    Public,
    AuthenticatedAny,
    RequiresRole(Vec<Role>),
}

impl AccessLevel {
    pub fn requires_role(roles: impl IntoIterator<Item = Role>) -> Self {
        AccessLevel::RequiresRole(roles.into_iter().collect())
    }

    pub fn admits(&self, role: Role) -> bool {
        match self {
            AccessLevel::Public | AccessLevel::AuthenticatedAny => true,
            AccessLevel::RequiresRole(roles) => roles.contains(&role),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Single,
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Self {
        let raw: Vec<&str> = split_path(pattern).collect();
        let last = raw.len().saturating_sub(1);

        let segments = raw
            .iter()
            .enumerate()
            .map(|(i, seg)| match *seg {
                "**" if i == last => Segment::Rest,
                "*" => Segment::Single,
                s if s.starts_with('{') && s.ends_with('}') => Segment::Single,
                s => Segment::Literal(s.to_owned()),
            })
            .collect();

        Self { segments }
    }

    pub fn matches(&self, path: &str) -> bool {
        let mut parts = split_path(path);

        for segment in &self.segments {
            match segment {
                Segment::Rest => return true,
                Segment::Single => {
                    if parts.next().is_none() {
                        return false;
                    }
                }
                Segment::Literal(expected) => match parts.next() {
                    Some(actual) if actual == expected => {}
                    _ => return false,
                },
            }
        }

        parts.next().is_none()
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty())
}

#[derive(Debug, Clone)]
pub struct RouteRule {
    method: Option<String>,
    pattern: RoutePattern,
    level: AccessLevel,
}

impl RouteRule {
    /// Rule matching any HTTP method.
    pub fn any(pattern: &str, level: AccessLevel) -> Self {
        Self {
            method: None,
            pattern: RoutePattern::parse(pattern),
            level,
        }
    }

    pub fn method(method: &str, pattern: &str, level: AccessLevel) -> Self {
        Self {
            method: Some(method.to_ascii_uppercase()),
            pattern: RoutePattern::parse(pattern),
            level,
        }
    }

    fn matches(&self, method: &str, path: &str) -> bool {
        let method_ok = self
            .method
            .as_deref()
            .is_none_or(|m| m.eq_ignore_ascii_case(method));
        method_ok && self.pattern.matches(path)
    }
}

#[derive(Debug, Clone)]
pub struct RoutePolicy {
    rules: Vec<RouteRule>,
    fallback: AccessLevel,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::marketplace_default()
    }
}

impl RoutePolicy {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self {
            rules,
            fallback: AccessLevel::AuthenticatedAny,
        }
    }

    pub fn with_fallback(mut self, fallback: AccessLevel) -> Self {
        self.fallback = fallback;
        self
    }

    /// Rules are checked before the existing ones.
    pub fn prepend(mut self, rules: impl IntoIterator<Item = RouteRule>) -> Self {
        let mut merged: Vec<RouteRule> = rules.into_iter().collect();
        merged.append(&mut self.rules);
        self.rules = merged;
        self
    }

    pub fn level_for(&self, method: &str, path: &str) -> &AccessLevel {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(|rule| &rule.level)
            .unwrap_or(&self.fallback)
    }

    /// Gating for the marketplace API: auth entry points and property reads
    /// are public, developer and transaction routes are role-restricted and
    /// the user listing is admin-only.
    pub fn marketplace_default() -> Self {
        use AccessLevel::{AuthenticatedAny, Public};

        let developer = || AccessLevel::requires_role([Role::Developer]);
        let customer = || AccessLevel::requires_role([Role::Customer]);

        Self::new(vec![
            RouteRule::any("/auth/me", AuthenticatedAny),
            RouteRule::any("/auth/**", Public),
            RouteRule::any("/api/properties/developer/**", developer()),
            RouteRule::method("GET", "/api/properties/**", Public),
            RouteRule::method("GET", "/properties/**", Public),
            RouteRule::any("/api/transactions/customer/**", customer()),
            RouteRule::method("POST", "/api/transactions/create", customer()),
            RouteRule::any("/api/transactions/property/**", developer()),
            RouteRule::method("DELETE", "/api/transactions/{id}", customer()),
            RouteRule::any("/api/users/me", AuthenticatedAny),
            RouteRule::method(
                "GET",
                "/api/users",
                AccessLevel::requires_role([Role::Admin]),
            ),
        ])
    }
}
