// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

//! Capability predicates.
//!
//! Pure functions over the authenticated caller (and, for ownership, the
//! target resource's owner id). Route-level gates run through the
//! extractors in [`super::extractor`]; ownership gates run inside handlers
//! after the resource is loaded, since ownership is unknown before fetch.

use super::AuthenticatedUser;

/// Caller may own listings.
pub fn is_business(user: &AuthenticatedUser) -> bool {
    user.is_business
}

/// Caller may moderate users and listings.
pub fn is_admin(user: &AuthenticatedUser) -> bool {
    user.is_admin
}

/// Route gate for listing mutation endpoints.
pub fn is_business_or_admin(user: &AuthenticatedUser) -> bool {
    user.is_business || user.is_admin
}

/// Ownership gate: the caller owns the resource, or moderates everything.
pub fn is_owner_or_admin(user: &AuthenticatedUser, resource_owner_id: &str) -> bool {
    user.user_id == resource_owner_id || user.is_admin
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, business: bool, admin: bool) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: id.to_string(),
            email: format!("{id}@example.com"),
            is_admin: admin,
            is_business: business,
            expires_at: 0,
        }
    }

    #[test]
    fn capability_flags_are_independent() {
        assert!(is_business(&user("u", true, false)));
        assert!(!is_business(&user("u", false, true)));
        assert!(is_admin(&user("u", false, true)));
        assert!(!is_admin(&user("u", true, false)));
    }

    #[test]
    fn business_or_admin_grid() {
        assert!(!is_business_or_admin(&user("u", false, false)));
        assert!(is_business_or_admin(&user("u", true, false)));
        assert!(is_business_or_admin(&user("u", false, true)));
        assert!(is_business_or_admin(&user("u", true, true)));
    }

    // Full grid: {owner match, mismatch} x {admin, not admin}.
    #[test]
    fn owner_or_admin_grid() {
        let owner_id = "owner";

        assert!(is_owner_or_admin(&user("owner", false, false), owner_id));
        assert!(is_owner_or_admin(&user("owner", false, true), owner_id));
        assert!(is_owner_or_admin(&user("stranger", false, true), owner_id));
        assert!(!is_owner_or_admin(&user("stranger", false, false), owner_id));
    }

    #[test]
    fn business_flag_grants_no_ownership() {
        assert!(!is_owner_or_admin(&user("stranger", true, false), "owner"));
    }
}
