// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

//! # Authentication Module
//!
//! Session tokens and capability checks for the directory API.
//!
//! ## Auth Flow
//!
//! 1. `POST /users` or `POST /users/login` issues an HS256 session token
//!    embedding `{id, email, isAdmin, isBusiness}` with a 7-day expiry
//! 2. Clients send `Authorization: Bearer <token>` on protected routes
//! 3. The [`Auth`] extractor verifies signature and expiry and exposes the
//!    decoded [`AuthenticatedUser`] to the handler
//!
//! ## Security
//!
//! - Token verification never touches the store: claims are trusted as of
//!   issuance, so a role change or deletion becomes visible only after the
//!   token expires (bounded by the 7-day TTL)
//! - Clock skew tolerance is 60 seconds
//! - Passwords are stored as Argon2id PHC strings only

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod policy;
pub mod token;

pub use claims::{AuthenticatedUser, SessionClaims};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, BusinessOnly, BusinessOrAdmin};
pub use token::{TokenService, TOKEN_TTL_DAYS};
