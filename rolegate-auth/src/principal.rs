//! Client principal model
//!
//! The identity platform reports the signed-in user as a "client principal"
//! payload on `GET /.auth/me`. An empty principal (all fields empty, no
//! roles) is the canonical "logged out / not yet resolved" value.

use crate::roles::{Role, Roles};
use serde::{Deserialize, Serialize};

/// Identity claims for the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPrincipal {
    /// Provider the user signed in with ("aad", "github", ...)
    #[serde(default)]
    pub identity_provider: String,
    /// Provider-specific stable user identifier
    #[serde(default)]
    pub user_id: String,
    /// Human-readable identifier (usually an email address)
    #[serde(default)]
    pub user_details: String,
    /// Roles assigned to the user
    #[serde(default)]
    pub user_roles: Roles,
}

impl ClientPrincipal {
    /// The empty sentinel: not logged in / not yet resolved
    pub fn empty() -> Self {
        Self {
            identity_provider: String::new(),
            user_id: String::new(),
            user_details: String::new(),
            user_roles: Vec::new(),
        }
    }

    pub fn new<S: Into<String>>(
        identity_provider: S,
        user_id: S,
        user_details: S,
        user_roles: Roles,
    ) -> Self {
        Self {
            identity_provider: identity_provider.into(),
            user_id: user_id.into(),
            user_details: user_details.into(),
            user_roles,
        }
    }

    /// A user is logged in iff the platform assigned them at least one role
    pub fn is_logged_in(&self) -> bool {
        !self.user_roles.is_empty()
    }

    /// Whether the user holds the given role
    pub fn has_role(&self, role: &Role) -> bool {
        self.user_roles.contains(role)
    }
}

impl Default for ClientPrincipal {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<&rolegate_core::UserOverride> for ClientPrincipal {
    fn from(user: &rolegate_core::UserOverride) -> Self {
        Self {
            identity_provider: user.identity_provider.clone(),
            user_id: user.user_id.clone(),
            user_details: user.user_details.clone(),
            user_roles: user.user_roles.iter().cloned().map(Role).collect(),
        }
    }
}

/// Wire envelope returned by the identity endpoint.
///
/// A missing or null `clientPrincipal` means "not logged in", not an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthMeResponse {
    #[serde(default)]
    pub client_principal: Option<ClientPrincipal>,
}

impl AuthMeResponse {
    /// Resolve the envelope to a principal, defaulting to the empty sentinel
    pub fn into_principal(self) -> ClientPrincipal {
        self.client_principal.unwrap_or_else(ClientPrincipal::empty)
    }
}
