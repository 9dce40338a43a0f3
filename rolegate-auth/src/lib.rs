//! Rolegate Auth - Role-based gating for client-side applications
//!
//! Given a user's assigned roles and a declared set of allowed roles, this
//! crate decides whether a guarded region of the interface renders its
//! protected content, an "unauthorized" view, or a transitional
//! "authenticating" view. It includes:
//!
//! - The pure authorization predicate (`authorize`)
//! - An identity-endpoint client for `GET /.auth/me`
//! - The authentication provider: the async state machine that resolves the
//!   current user once per mount and publishes it as an ambient context
//! - Guard types that turn a published snapshot into a render decision
//!
//! ## Architecture
//!
//! Data flows one direction: the provider resolves a user, guards evaluate
//! the predicate against that user, and every decision is returned as data.
//! This is a UI-gating convenience layer, not a security boundary; the
//! identity platform remains the source of truth.

pub mod authorize;
pub mod client;
pub mod guard;
pub mod principal;
pub mod provider;
pub mod roles;

pub use authorize::authorize;
pub use client::{
    IdentityClient, IdentityClientConfig, LoginProvider, PrincipalSource, StaticPrincipalSource,
};
pub use guard::{Guard, GuardDecision, GuardOutcome, GuardPolicy, UnauthorizedBehavior};
pub use principal::{AuthMeResponse, ClientPrincipal};
pub use provider::{AuthHandle, AuthProvider, AuthSnapshot, LoginAction};
pub use roles::{Role, Roles};

use rolegate_core::{ErrorContext, RolegateError};

/// Authentication-layer error type
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("There was a problem reaching the login service. Please try again later.")]
    LoginService {
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("There was a problem reading the response from the login service. Please try again later.")]
    MalformedResponse {
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Logins with this provider have been disabled by site owner.")]
    ProviderDisabled { provider: client::LoginProvider },

    #[error("Failed to build the identity client: {message}")]
    ClientBuild { message: String },
}

pub type AuthResult<T> = Result<T, AuthError>;

impl From<AuthError> for RolegateError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        RolegateError::Auth {
            message,
            source: Some(Box::new(err)),
            context: ErrorContext::new("rolegate-auth"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_carry_the_user_facing_messages() {
        assert_eq!(
            AuthError::LoginService { source: None }.to_string(),
            "There was a problem reaching the login service. Please try again later."
        );
        assert_eq!(
            AuthError::MalformedResponse { source: None }.to_string(),
            "There was a problem reading the response from the login service. Please try again later."
        );
    }

    #[test]
    fn auth_errors_convert_into_the_core_error_type() {
        let err: RolegateError = AuthError::ClientBuild {
            message: "bad builder".to_string(),
        }
        .into();
        assert!(err.to_string().contains("bad builder"));
        assert!(err.context().is_some());
    }
}
