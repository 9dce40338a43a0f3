//! Authorization predicate
//!
//! The single decision function of the system. Pure and synchronous: no
//! I/O, no state, re-evaluated on every call.

use crate::principal::ClientPrincipal;
use crate::roles::Role;

/// Determine whether a user is authorized against a set of allowed roles.
///
/// With `all_but == false` the user is authorized if they hold at least one
/// role inside `allowed_roles`. With `all_but == true` the user is
/// authorized if they hold at least one role outside `allowed_roles`.
///
/// A user with no roles is never authorized. Order and duplicates in either
/// list are irrelevant.
pub fn authorize(allowed_roles: &[Role], user: &ClientPrincipal, all_but: bool) -> bool {
    if all_but {
        // At least one held role outside the disallowed set
        user.user_roles
            .iter()
            .any(|role| !allowed_roles.contains(role))
    } else {
        // At least one held role inside the allowed set
        user.user_roles
            .iter()
            .any(|role| allowed_roles.contains(role))
    }
}
