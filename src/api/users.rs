// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

//! User endpoints: registration, login, current-user lookup.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::{password, Auth},
    error::ApiError,
    models::{AuthResponse, CurrentUserResponse, LoginRequest, PublicUser, RegisterRequest},
    state::AppState,
    storage::{StorageError, StoredUser, UserRepository},
    validation,
};

/// Register a new account.
///
/// `isBusiness` may be requested; `isAdmin` is always forced false — admin
/// status is only ever granted by an existing admin. Responds with a fresh
/// session token.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterRequest,
    tag = "Users",
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation failure"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    validation::validate_register(&req)?;

    let email = validation::normalize_email(&req.email);
    let password_hash =
        password::hash_password(&req.password).map_err(|e| ApiError::internal(e.to_string()))?;

    let now = Utc::now();
    let user = StoredUser {
        id: Uuid::new_v4().to_string(),
        first_name: req.first_name.trim().to_string(),
        middle_name: req.middle_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        phone: req.phone.trim().to_string(),
        email,
        password_hash,
        image: req.image,
        address: req.address,
        is_business: req.is_business,
        // Never from registration input.
        is_admin: false,
        created_at: now,
        updated_at: now,
    };

    {
        let store = state.store.write().await;
        let repo = UserRepository::new(&store);
        repo.create(&user).map_err(|e| match e {
            StorageError::AlreadyExists(_) => ApiError::conflict("Email already in use"),
            other => other.into(),
        })?;
    }

    let token = state
        .tokens
        .issue(&user)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, is_business = user.is_business, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            msg: "User registered successfully".to_string(),
            token,
            user: PublicUser::from(&user),
        }),
    ))
}

/// Log in with email and password.
///
/// Unknown email and wrong password produce the same 401 so the endpoint
/// cannot be used to probe which addresses are registered.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login_user(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let email = validation::normalize_email(&req.email);
    let user = {
        let store = state.store.read().await;
        UserRepository::new(&store).find_by_email(&email)?
    };

    let Some(user) = user else {
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !password::verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = state
        .tokens
        .issue(&user)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(AuthResponse {
        msg: "Login successful".to_string(),
        token,
        user: PublicUser::from(&user),
    }))
}

/// Get the current authenticated user's record.
///
/// A valid token whose subject has since been deleted surfaces here as a
/// clean 404 (the token stays verifiable until it expires).
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn get_current_user(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let store = state.store.read().await;
    let stored = UserRepository::new(&store)
        .get(&user.user_id)
        .map_err(|_| ApiError::not_found("User not found"))?;

    Ok(Json(CurrentUserResponse {
        user: PublicUser::from(&stored),
    }))
}
