// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        AdminStatsResponse, Address, AuthResponse, CardListResponse, CardLiker,
        CardMessageResponse, CardOwner, CardPayload, CardResponse, CardView, CurrentUserResponse,
        ImageRef, LikeResponse, LoginRequest, MessageResponse, PublicUser, RegisterRequest,
        StatsCounts, UserListResponse, UserMessageResponse,
    },
    state::AppState,
};

pub mod admin;
pub mod cards;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health))
        .route("/users", post(users::register_user))
        .route("/users/login", post(users::login_user))
        .route("/users/me", get(users::get_current_user))
        .route("/cards", get(cards::list_cards).post(cards::create_card))
        .route("/cards/my/cards", get(cards::list_my_cards))
        .route(
            "/cards/{card_id}",
            get(cards::get_card)
                .put(cards::update_card)
                .delete(cards::delete_card),
        )
        .route("/cards/{card_id}/like", patch(cards::toggle_like))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{user_id}", delete(admin::delete_user))
        .route(
            "/admin/users/{user_id}/toggle-admin",
            patch(admin::toggle_admin_status),
        )
        .route("/admin/stats", get(admin::get_stats))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        users::register_user,
        users::login_user,
        users::get_current_user,
        cards::list_cards,
        cards::get_card,
        cards::create_card,
        cards::update_card,
        cards::delete_card,
        cards::toggle_like,
        cards::list_my_cards,
        admin::list_users,
        admin::delete_user,
        admin::toggle_admin_status,
        admin::get_stats
    ),
    components(
        schemas(
            health::HealthResponse,
            Address,
            ImageRef,
            RegisterRequest,
            LoginRequest,
            PublicUser,
            AuthResponse,
            CurrentUserResponse,
            CardPayload,
            CardOwner,
            CardLiker,
            CardView,
            CardListResponse,
            CardResponse,
            CardMessageResponse,
            LikeResponse,
            MessageResponse,
            UserListResponse,
            UserMessageResponse,
            StatsCounts,
            AdminStatsResponse
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Users", description = "Registration, login, and sessions"),
        (name = "Cards", description = "Business listings and likes"),
        (name = "Admin", description = "Moderation and dashboard statistics")
    )
)]
struct ApiDoc;
