// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

//! Session token claims and the authenticated caller representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims embedded in a session token.
///
/// The role flags ride in the token so protected routes never need a store
/// round trip to authorize a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the user's id.
    pub sub: String,

    /// Login email at issuance time.
    pub email: String,

    /// Whether the subject may moderate users and listings.
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,

    /// Whether the subject may own listings.
    #[serde(rename = "isBusiness")]
    pub is_business: bool,

    /// Issued at timestamp (seconds since epoch).
    pub iat: i64,

    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// The authenticated caller, extracted from a verified session token.
///
/// This is the primary type used throughout the application to represent
/// who is making a request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Canonical user id (the token's `sub` claim).
    pub user_id: String,

    /// Email at issuance time.
    pub email: String,

    /// Moderation capability.
    pub is_admin: bool,

    /// Listing-ownership capability.
    pub is_business: bool,

    /// Token expiration (Unix timestamp, not serialized).
    #[serde(skip)]
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Create from verified session claims.
    pub fn from_claims(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            is_admin: claims.is_admin,
            is_business: claims.is_business,
            expires_at: claims.exp,
        }
    }
}
