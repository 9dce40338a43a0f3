//! Guard evaluation
//!
//! Guards apply the authorization predicate to a published snapshot and
//! pick a render branch. All decisions are returned as data; rendering and
//! navigation stay with the host.

use crate::authorize::authorize;
use crate::provider::AuthSnapshot;
use crate::roles::Roles;

/// The tri-state authorization status of a guarded region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Resolution still in flight; show a transitional view
    Authenticating,
    /// The user satisfies the policy; render the protected content
    Authorized,
    /// The user does not satisfy the policy
    Unauthorized,
}

/// The role policy of a guarded region
#[derive(Debug, Clone, Default)]
pub struct GuardPolicy {
    /// Roles the region is gated on
    pub allowed_roles: Roles,
    /// Exclusion mode: authorize any role outside `allowed_roles` instead
    pub all_but: bool,
}

impl GuardPolicy {
    /// Authorize users holding at least one of the given roles
    pub fn allowing(allowed_roles: Roles) -> Self {
        Self {
            allowed_roles,
            all_but: false,
        }
    }

    /// Authorize users holding at least one role outside the given roles
    pub fn all_but(disallowed_roles: Roles) -> Self {
        Self {
            allowed_roles: disallowed_roles,
            all_but: true,
        }
    }

    /// Evaluate the policy against a published snapshot
    pub fn evaluate(&self, snapshot: &AuthSnapshot) -> GuardOutcome {
        if snapshot.is_authenticating {
            return GuardOutcome::Authenticating;
        }
        if authorize(&self.allowed_roles, &snapshot.user, self.all_but) {
            GuardOutcome::Authorized
        } else {
            GuardOutcome::Unauthorized
        }
    }
}

/// What a guard does with an unauthorized user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnauthorizedBehavior {
    /// Render nothing at all
    Hide,
    /// Render a caller-supplied fallback view
    Fallback,
    /// Redirect to a fixed path
    Redirect(String),
    /// Redirect logged-out users to the login path; show the fallback to
    /// users who are logged in but still unauthorized
    LoginOrFallback { login_path: String },
}

/// Render instruction produced by a guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the transitional "authenticating" view
    ShowAuthenticating,
    /// Render the protected content
    ShowContent,
    /// Render nothing
    ShowNothing,
    /// Render the caller-supplied fallback view
    ShowFallback,
    /// Navigate to the given path
    RedirectTo(String),
}

/// A guarded region: a role policy plus the unauthorized behavior
#[derive(Debug, Clone)]
pub struct Guard {
    pub policy: GuardPolicy,
    pub unauthorized: UnauthorizedBehavior,
}

impl Guard {
    pub fn new(policy: GuardPolicy, unauthorized: UnauthorizedBehavior) -> Self {
        Self {
            policy,
            unauthorized,
        }
    }

    /// Decide what to render for the given snapshot
    pub fn decide(&self, snapshot: &AuthSnapshot) -> GuardDecision {
        match self.policy.evaluate(snapshot) {
            GuardOutcome::Authenticating => GuardDecision::ShowAuthenticating,
            GuardOutcome::Authorized => GuardDecision::ShowContent,
            GuardOutcome::Unauthorized => match &self.unauthorized {
                UnauthorizedBehavior::Hide => GuardDecision::ShowNothing,
                UnauthorizedBehavior::Fallback => GuardDecision::ShowFallback,
                UnauthorizedBehavior::Redirect(path) => GuardDecision::RedirectTo(path.clone()),
                UnauthorizedBehavior::LoginOrFallback { login_path } => {
                    if snapshot.is_logged_in {
                        GuardDecision::ShowFallback
                    } else {
                        GuardDecision::RedirectTo(login_path.clone())
                    }
                }
            },
        }
    }
}
