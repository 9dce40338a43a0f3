//! Role vocabulary
//!
//! Roles are opaque string tags. A small built-in vocabulary covers the
//! roles the identity platform assigns on its own, but the set is open:
//! consumers mint arbitrary tags and no validation against a closed
//! enumeration happens at evaluation time.

use serde::{Deserialize, Serialize};

/// An opaque role tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(pub String);

impl Role {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered sequence of roles. Duplicates and order carry no meaning for
/// authorization decisions.
pub type Roles = Vec<Role>;

/// Every authenticated user holds this role
pub const AUTHENTICATED: &str = "authenticated";
/// Every visitor holds this role, logged in or not
pub const ANONYMOUS: &str = "anonymous";
/// Site-wide administrator
pub const GLOBAL_ADMIN: &str = "global_admin";
/// Site-wide read-only access
pub const GLOBAL_VIEWER: &str = "global_viewer";

/// Build a role list from string tags
pub fn roles<I, S>(names: I) -> Roles
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(|name| Role(name.into())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_vocabulary_matches_platform_tags() {
        assert_eq!(AUTHENTICATED, "authenticated");
        assert_eq!(ANONYMOUS, "anonymous");
        assert_eq!(GLOBAL_ADMIN, "global_admin");
        assert_eq!(GLOBAL_VIEWER, "global_viewer");
    }

    #[test]
    fn roles_are_open_vocabulary() {
        let custom = Role::from("my_private_page_role");
        assert_eq!(custom.as_str(), "my_private_page_role");
        assert_eq!(custom.to_string(), "my_private_page_role");
    }

    #[test]
    fn roles_serialize_as_plain_strings() {
        let role = Role::from(AUTHENTICATED);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"authenticated\"");
        let parsed: Role = serde_json::from_str("\"global_admin\"").unwrap();
        assert_eq!(parsed, Role::from(GLOBAL_ADMIN));
    }
}
