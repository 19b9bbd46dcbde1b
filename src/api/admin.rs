// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

//! Admin-only endpoints for moderation and dashboard statistics.
//!
//! Every route requires the admin capability. Self-targeting mutations are
//! rejected with 400: an admin may not delete their own account or flip
//! their own admin flag through these endpoints.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use crate::{
    auth::AdminOnly,
    error::ApiError,
    models::{
        AdminStatsResponse, CardView, MessageResponse, PublicUser, StatsCounts, UserListResponse,
        UserMessageResponse,
    },
    state::AppState,
    storage::{CardRepository, StoredUser, UserRepository},
};

fn sorted_public_views(mut users: Vec<StoredUser>) -> Vec<PublicUser> {
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    users.iter().map(PublicUser::from).collect()
}

/// List all users, newest first. Password hashes never leave the store.
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All users", body = UserListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin required")
    )
)]
pub async fn list_users(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<UserListResponse>, ApiError> {
    let store = state.store.read().await;
    let users = UserRepository::new(&store).list_all()?;

    Ok(Json(UserListResponse {
        users: sorted_public_views(users),
    }))
}

/// Delete a user and cascade-delete their listings.
///
/// Cards go first, under the same store write lock: if any card deletion
/// fails the user record stays, and re-issuing the request completes the
/// cascade. Never removes orphaned-card states.
#[utoipa::path(
    delete,
    path = "/admin/users/{user_id}",
    params(("user_id" = String, Path, description = "Target user identifier")),
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User and their listings deleted", body = MessageResponse),
        (status = 400, description = "Attempted self-deletion"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin required"),
        (status = 404, description = "No such user")
    )
)]
pub async fn delete_user(
    AdminOnly(admin): AdminOnly,
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    if user_id == admin.user_id {
        return Err(ApiError::bad_request("Cannot delete your own account"));
    }

    let store = state.store.write().await;
    let users = UserRepository::new(&store);

    if !users.exists(&user_id) {
        return Err(ApiError::not_found("User not found"));
    }

    let removed_cards = CardRepository::new(&store).delete_by_owner(&user_id)?;
    users.delete(&user_id)?;

    tracing::info!(
        target_id = %user_id,
        admin_id = %admin.user_id,
        removed_cards,
        "user deleted with cascade"
    );

    Ok(Json(MessageResponse {
        msg: "User and their business listings deleted successfully".to_string(),
    }))
}

/// Flip another user's admin flag.
#[utoipa::path(
    patch,
    path = "/admin/users/{user_id}/toggle-admin",
    params(("user_id" = String, Path, description = "Target user identifier")),
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated user", body = UserMessageResponse),
        (status = 400, description = "Attempted self-toggle"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin required"),
        (status = 404, description = "No such user")
    )
)]
pub async fn toggle_admin_status(
    AdminOnly(admin): AdminOnly,
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UserMessageResponse>, ApiError> {
    if user_id == admin.user_id {
        return Err(ApiError::bad_request("Cannot change your own admin status"));
    }

    let store = state.store.write().await;
    let repo = UserRepository::new(&store);

    let mut user = repo
        .get(&user_id)
        .map_err(|_| ApiError::not_found("User not found"))?;

    user.is_admin = !user.is_admin;
    user.updated_at = Utc::now();
    repo.update(&user)?;

    tracing::info!(
        target_id = %user.id,
        admin_id = %admin.user_id,
        is_admin = user.is_admin,
        "admin status toggled"
    );

    Ok(Json(UserMessageResponse {
        msg: if user.is_admin {
            "User promoted to admin".to_string()
        } else {
            "User removed from admin".to_string()
        },
        user: PublicUser::from(&user),
    }))
}

/// Dashboard statistics: aggregate counts plus the five newest users and
/// listings.
#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Dashboard statistics", body = AdminStatsResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin required")
    )
)]
pub async fn get_stats(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<AdminStatsResponse>, ApiError> {
    let store = state.store.read().await;
    let users = UserRepository::new(&store).list_all()?;
    let mut cards = CardRepository::new(&store).list_all()?;

    let stats = StatsCounts {
        total_users: users.len(),
        total_cards: cards.len(),
        business_users: users.iter().filter(|u| u.is_business).count(),
        admin_users: users.iter().filter(|u| u.is_admin).count(),
    };

    let user_index: HashMap<String, StoredUser> = users
        .iter()
        .map(|u| (u.id.clone(), u.clone()))
        .collect();

    cards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_cards = cards
        .iter()
        .take(5)
        .map(|card| CardView::resolve(card, &user_index))
        .collect();

    let recent_users = sorted_public_views(users)
        .into_iter()
        .take(5)
        .collect();

    Ok(Json(AdminStatsResponse {
        stats,
        recent_users,
        recent_cards,
    }))
}
