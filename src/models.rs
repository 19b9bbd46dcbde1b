// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

//! # API Data Models
//!
//! Request and response data structures used by the REST API. All types
//! derive `Serialize`, `Deserialize`, and `ToSchema` for automatic JSON
//! handling and OpenAPI documentation.
//!
//! Wire payloads use camelCase field names (`isBusiness`, `houseNumber`,
//! `createdBy`) to stay compatible with existing API consumers.
//!
//! ## Model Categories
//!
//! - **Users**: registration/login requests, the public user view
//! - **Cards**: the listing payload and the resolved listing view
//! - **Admin**: moderation responses and dashboard statistics

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::{StoredCard, StoredUser};

// =============================================================================
// Shared Value Types
// =============================================================================

/// An image reference: URL plus alt text. Both optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

/// A postal address. Country, city, street, and house number are required;
/// state and zip are optional.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub state: String,
    pub country: String,
    pub city: String,
    pub street: String,
    pub house_number: i64,
    #[serde(default)]
    pub zip: Option<i64>,
}

// =============================================================================
// User Models
// =============================================================================

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub image: ImageRef,
    pub address: Address,
    /// Request a business account (may own listings).
    #[serde(default)]
    pub is_business: bool,
    /// Accepted on the wire for compatibility, never honored: admin status
    /// is only granted by an existing admin.
    #[serde(default)]
    pub is_admin: bool,
}

/// Login request body. Fields are checked by the handler so an empty body
/// yields a 400 rather than a deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// A user as exposed through the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub image: ImageRef,
    pub address: Address,
    pub is_business: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&StoredUser> for PublicUser {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            middle_name: user.middle_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
            address: user.address.clone(),
            is_business: user.is_business,
            is_admin: user.is_admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Response for registration and login: a fresh session token plus the
/// public view of the account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub msg: String,
    pub token: String,
    pub user: PublicUser,
}

/// Response wrapper for GET /users/me.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponse {
    pub user: PublicUser,
}

// =============================================================================
// Card Models
// =============================================================================

/// Create/update body for a card. `createdBy` and `likes` are intentionally
/// absent: ownership comes from the session, likes from the like endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardPayload {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub description: String,
    pub phone: String,
    #[serde(default)]
    pub image: ImageRef,
    pub address: Address,
}

/// The owner of a card, resolved to display fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardOwner {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A user who liked a card, resolved to display fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardLiker {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

/// A card as exposed through the API, with owner and likers resolved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub phone: String,
    pub image: ImageRef,
    pub address: Address,
    pub created_by: CardOwner,
    pub likes: Vec<CardLiker>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CardView {
    /// Resolve a stored card against a user-id index.
    ///
    /// A liker id with no live user record is dropped from the view; the
    /// owner is rendered with empty display fields in the same case (cascade
    /// deletion makes that unreachable in practice).
    pub fn resolve(card: &StoredCard, users: &HashMap<String, StoredUser>) -> Self {
        let created_by = match users.get(&card.created_by) {
            Some(owner) => CardOwner {
                id: owner.id.clone(),
                first_name: owner.first_name.clone(),
                last_name: owner.last_name.clone(),
                email: owner.email.clone(),
            },
            None => CardOwner {
                id: card.created_by.clone(),
                first_name: String::new(),
                last_name: String::new(),
                email: String::new(),
            },
        };

        let likes = card
            .likes
            .iter()
            .filter_map(|liker_id| {
                users.get(liker_id).map(|u| CardLiker {
                    id: u.id.clone(),
                    first_name: u.first_name.clone(),
                    last_name: u.last_name.clone(),
                })
            })
            .collect();

        Self {
            id: card.id.clone(),
            title: card.title.clone(),
            subtitle: card.subtitle.clone(),
            description: card.description.clone(),
            phone: card.phone.clone(),
            image: card.image.clone(),
            address: card.address.clone(),
            created_by,
            likes,
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

/// Response wrapper for card listings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CardListResponse {
    pub cards: Vec<CardView>,
}

/// Response wrapper for a single card.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CardResponse {
    pub card: CardView,
}

/// Response for card create/update.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CardMessageResponse {
    pub msg: String,
    pub card: CardView,
}

/// Response for the like toggle: the updated card plus the caller's new
/// like state.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub msg: String,
    pub card: CardView,
    pub is_liked: bool,
}

/// Bare confirmation message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub msg: String,
}

// =============================================================================
// Admin Models
// =============================================================================

/// Response wrapper for the admin user listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<PublicUser>,
}

/// Response for the admin toggle of another user's admin flag.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserMessageResponse {
    pub msg: String,
    pub user: PublicUser,
}

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsCounts {
    pub total_users: usize,
    pub total_cards: usize,
    pub business_users: usize,
    pub admin_users: usize,
}

/// Admin dashboard payload: counts plus the most recent records.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsResponse {
    pub stats: StatsCounts,
    pub recent_users: Vec<PublicUser>,
    pub recent_cards: Vec<CardView>,
}
