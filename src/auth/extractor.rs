// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

//! Axum extractors for authenticated and capability-gated callers.
//!
//! Use `Auth` in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```
//!
//! `BusinessOnly`, `AdminOnly`, and `BusinessOrAdmin` layer the capability
//! predicates from [`super::policy`] on top; they run before the handler
//! body, so route-level gates reject before any resource is loaded.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{policy, AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Extractor for authenticated callers.
///
/// Verifies the bearer token from the Authorization header and exposes the
/// decoded [`AuthenticatedUser`]. A pre-populated request extension wins
/// over the header, which lets tests and middleware inject identities.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        let user = state.tokens.verify(token)?;

        Ok(Auth(user))
    }
}

/// Extractor that additionally requires the business capability.
pub struct BusinessOnly(pub AuthenticatedUser);

impl FromRequestParts<AppState> for BusinessOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !policy::is_business(&user) {
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(BusinessOnly(user))
    }
}

/// Extractor that additionally requires the admin capability.
pub struct AdminOnly(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !policy::is_admin(&user) {
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(user))
    }
}

/// Extractor that requires either capability. Ownership is still checked
/// inside the handler once the resource is loaded.
pub struct BusinessOrAdmin(pub AuthenticatedUser);

impl FromRequestParts<AppState> for BusinessOrAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !policy::is_business_or_admin(&user) {
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(BusinessOrAdmin(user))
    }
}
