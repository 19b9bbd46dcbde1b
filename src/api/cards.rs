// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

//! Card (business listing) endpoints.
//!
//! Route-level capability gates run through the extractors; ownership is
//! checked after the card is loaded, since the owner is unknown before
//! fetch. Mutations hold the store write lock for the whole sequence.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::{policy, Auth, BusinessOnly, BusinessOrAdmin},
    error::ApiError,
    models::{
        CardListResponse, CardMessageResponse, CardPayload, CardResponse, CardView, LikeResponse,
        MessageResponse,
    },
    state::AppState,
    storage::{
        CardRepository, DocumentStore, StorageResult, StoredCard, StoredUser, UserRepository,
    },
    validation,
};

/// Build the user-id index used to resolve owner and liker names.
fn users_index(store: &DocumentStore) -> StorageResult<HashMap<String, StoredUser>> {
    Ok(UserRepository::new(store)
        .list_all()?
        .into_iter()
        .map(|user| (user.id.clone(), user))
        .collect())
}

fn resolve_sorted(
    mut cards: Vec<StoredCard>,
    users: &HashMap<String, StoredUser>,
) -> Vec<CardView> {
    cards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    cards
        .iter()
        .map(|card| CardView::resolve(card, users))
        .collect()
}

/// List all business listings, newest first. Public.
#[utoipa::path(
    get,
    path = "/cards",
    tag = "Cards",
    responses(
        (status = 200, description = "All listings", body = CardListResponse),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_cards(State(state): State<AppState>) -> Result<Json<CardListResponse>, ApiError> {
    let store = state.store.read().await;
    let cards = CardRepository::new(&store).list_all()?;
    let users = users_index(&store)?;

    Ok(Json(CardListResponse {
        cards: resolve_sorted(cards, &users),
    }))
}

/// Get a single listing by id. Public.
#[utoipa::path(
    get,
    path = "/cards/{card_id}",
    params(("card_id" = String, Path, description = "Listing identifier")),
    tag = "Cards",
    responses(
        (status = 200, description = "The listing", body = CardResponse),
        (status = 404, description = "No such listing")
    )
)]
pub async fn get_card(
    Path(card_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<CardResponse>, ApiError> {
    let store = state.store.read().await;
    let card = CardRepository::new(&store)
        .get(&card_id)
        .map_err(|_| ApiError::not_found("Business listing not found"))?;
    let users = users_index(&store)?;

    Ok(Json(CardResponse {
        card: CardView::resolve(&card, &users),
    }))
}

/// Create a listing. Business accounts only; the owner is always the
/// caller, never a payload field.
#[utoipa::path(
    post,
    path = "/cards",
    request_body = CardPayload,
    tag = "Cards",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Listing created", body = CardMessageResponse),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Business account required")
    )
)]
pub async fn create_card(
    BusinessOnly(user): BusinessOnly,
    State(state): State<AppState>,
    payload: Result<Json<CardPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<CardMessageResponse>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    validation::validate_card_payload(&payload)?;

    let now = Utc::now();
    let card = StoredCard {
        id: Uuid::new_v4().to_string(),
        title: payload.title.trim().to_string(),
        subtitle: payload.subtitle.trim().to_string(),
        description: payload.description.trim().to_string(),
        phone: payload.phone.trim().to_string(),
        image: payload.image,
        address: payload.address,
        created_by: user.user_id.clone(),
        likes: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    let store = state.store.write().await;
    CardRepository::new(&store).create(&card)?;
    let users = users_index(&store)?;

    tracing::info!(card_id = %card.id, owner = %user.user_id, "listing created");

    Ok((
        StatusCode::CREATED,
        Json(CardMessageResponse {
            msg: "Business listing created successfully".to_string(),
            card: CardView::resolve(&card, &users),
        }),
    ))
}

/// Replace a listing's editable fields. Owner or admin.
///
/// `createdBy` and `likes` are not part of the payload and survive the
/// replace untouched.
#[utoipa::path(
    put,
    path = "/cards/{card_id}",
    params(("card_id" = String, Path, description = "Listing identifier")),
    request_body = CardPayload,
    tag = "Cards",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Listing updated", body = CardMessageResponse),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner or an admin"),
        (status = 404, description = "No such listing")
    )
)]
pub async fn update_card(
    BusinessOrAdmin(user): BusinessOrAdmin,
    Path(card_id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<CardPayload>, JsonRejection>,
) -> Result<Json<CardMessageResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    // Malformed input is rejected before the card is even loaded.
    validation::validate_card_payload(&payload)?;

    let store = state.store.write().await;
    let repo = CardRepository::new(&store);

    let mut card = repo
        .get(&card_id)
        .map_err(|_| ApiError::not_found("Business listing not found"))?;

    if !policy::is_owner_or_admin(&user, &card.created_by) {
        return Err(ApiError::forbidden(
            "Access denied. You can only edit your own business listings.",
        ));
    }

    card.title = payload.title.trim().to_string();
    card.subtitle = payload.subtitle.trim().to_string();
    card.description = payload.description.trim().to_string();
    card.phone = payload.phone.trim().to_string();
    card.image = payload.image;
    card.address = payload.address;
    card.updated_at = Utc::now();

    repo.update(&card)?;
    let users = users_index(&store)?;

    Ok(Json(CardMessageResponse {
        msg: "Business listing updated successfully".to_string(),
        card: CardView::resolve(&card, &users),
    }))
}

/// Delete a listing. Owner or admin.
#[utoipa::path(
    delete,
    path = "/cards/{card_id}",
    params(("card_id" = String, Path, description = "Listing identifier")),
    tag = "Cards",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Listing deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner or an admin"),
        (status = 404, description = "No such listing")
    )
)]
pub async fn delete_card(
    BusinessOrAdmin(user): BusinessOrAdmin,
    Path(card_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let store = state.store.write().await;
    let repo = CardRepository::new(&store);

    let card = repo
        .get(&card_id)
        .map_err(|_| ApiError::not_found("Business listing not found"))?;

    if !policy::is_owner_or_admin(&user, &card.created_by) {
        return Err(ApiError::forbidden(
            "Access denied. You can only delete your own business listings.",
        ));
    }

    repo.delete(&card_id)?;

    tracing::info!(card_id = %card_id, caller = %user.user_id, "listing deleted");

    Ok(Json(MessageResponse {
        msg: "Business listing deleted successfully".to_string(),
    }))
}

/// Toggle the caller's like on a listing. Any authenticated user, own
/// listings included.
#[utoipa::path(
    patch,
    path = "/cards/{card_id}/like",
    params(("card_id" = String, Path, description = "Listing identifier")),
    tag = "Cards",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Toggled like state", body = LikeResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such listing")
    )
)]
pub async fn toggle_like(
    Auth(user): Auth,
    Path(card_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LikeResponse>, ApiError> {
    // Write lock held across the read-modify-write: concurrent toggles for
    // the same caller cannot both observe "not liked".
    let store = state.store.write().await;
    let (card, is_liked) = CardRepository::new(&store)
        .toggle_like(&card_id, &user.user_id)
        .map_err(|_| ApiError::not_found("Business listing not found"))?;
    let users = users_index(&store)?;

    Ok(Json(LikeResponse {
        msg: if is_liked {
            "Business listing liked".to_string()
        } else {
            "Business listing unliked".to_string()
        },
        card: CardView::resolve(&card, &users),
        is_liked,
    }))
}

/// List the caller's own listings, newest first. Business accounts only.
#[utoipa::path(
    get,
    path = "/cards/my/cards",
    tag = "Cards",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The caller's listings", body = CardListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Business account required")
    )
)]
pub async fn list_my_cards(
    BusinessOnly(user): BusinessOnly,
    State(state): State<AppState>,
) -> Result<Json<CardListResponse>, ApiError> {
    let store = state.store.read().await;
    let cards = CardRepository::new(&store).list_by_owner(&user.user_id)?;
    let users = users_index(&store)?;

    Ok(Json(CardListResponse {
        cards: resolve_sorted(cards, &users),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthenticatedUser, TokenService};
    use crate::models::{Address, ImageRef};
    use crate::storage::{DocumentStore, StoragePaths};
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let paths = StoragePaths::new(temp_dir.path());
        let mut store = DocumentStore::new(paths);
        store.initialize().expect("Failed to initialize store");
        (AppState::new(store, TokenService::new(b"test-secret")), temp_dir)
    }

    fn caller(id: &str, business: bool, admin: bool) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: id.to_string(),
            email: format!("{id}@example.com"),
            is_admin: admin,
            is_business: business,
            expires_at: 0,
        }
    }

    async fn seed_user(state: &AppState, id: &str, first: &str) {
        let now = Utc::now();
        let user = StoredUser {
            id: id.to_string(),
            first_name: first.to_string(),
            middle_name: String::new(),
            last_name: "Levi".to_string(),
            phone: "050-1234567".to_string(),
            email: format!("{id}@example.com"),
            password_hash: "$argon2id$stub".to_string(),
            image: ImageRef::default(),
            address: test_address(),
            is_business: true,
            is_admin: false,
            created_at: now,
            updated_at: now,
        };
        let store = state.store.write().await;
        UserRepository::new(&store).create(&user).unwrap();
    }

    fn test_address() -> Address {
        Address {
            state: String::new(),
            country: "Israel".to_string(),
            city: "Haifa".to_string(),
            street: "HaNamal".to_string(),
            house_number: 12,
            zip: None,
        }
    }

    fn card_payload(title: &str) -> CardPayload {
        CardPayload {
            title: title.to_string(),
            subtitle: String::new(),
            description: "Neighborhood espresso bar".to_string(),
            phone: "050-7654321".to_string(),
            image: ImageRef::default(),
            address: test_address(),
        }
    }

    async fn create_for(state: &AppState, owner_id: &str, title: &str) -> CardView {
        let (_, Json(res)) = create_card(
            BusinessOnly(caller(owner_id, true, false)),
            State(state.clone()),
            Ok(Json(card_payload(title))),
        )
        .await
        .expect("card creation succeeds");
        res.card
    }

    #[tokio::test]
    async fn create_card_sets_owner_from_caller() {
        let (state, _dir) = test_state();
        seed_user(&state, "owner-1", "Dana").await;

        let card = create_for(&state, "owner-1", "Cafe Luna").await;
        assert_eq!(card.created_by.id, "owner-1");
        assert_eq!(card.created_by.first_name, "Dana");
        assert!(card.likes.is_empty());
    }

    #[tokio::test]
    async fn create_card_rejects_invalid_payload() {
        let (state, _dir) = test_state();
        seed_user(&state, "owner-1", "Dana").await;

        let mut payload = card_payload("Cafe Luna");
        payload.description = "short".to_string();

        let err = create_card(
            BusinessOnly(caller("owner-1", true, false)),
            State(state),
            Ok(Json(payload)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_card_returns_resolved_view() {
        let (state, _dir) = test_state();
        seed_user(&state, "owner-1", "Dana").await;
        let card = create_for(&state, "owner-1", "Cafe Luna").await;

        let Json(res) = get_card(Path(card.id.clone()), State(state))
            .await
            .expect("lookup succeeds");
        assert_eq!(res.card.title, "Cafe Luna");
        assert_eq!(res.card.created_by.first_name, "Dana");
    }

    #[tokio::test]
    async fn get_missing_card_is_404() {
        let (state, _dir) = test_state();
        let err = get_card(Path("nothing".to_string()), State(state))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Business listing not found");
    }

    #[tokio::test]
    async fn list_cards_is_newest_first() {
        let (state, _dir) = test_state();
        seed_user(&state, "owner-1", "Dana").await;

        // Force distinct timestamps regardless of clock resolution.
        {
            let store = state.store.write().await;
            let repo = CardRepository::new(&store);
            for (i, title) in ["First", "Second", "Third"].iter().enumerate() {
                let now = Utc::now() + chrono::Duration::seconds(i as i64);
                repo.create(&StoredCard {
                    id: format!("c-{i}"),
                    title: title.to_string(),
                    subtitle: String::new(),
                    description: "Neighborhood espresso bar".to_string(),
                    phone: "050-7654321".to_string(),
                    image: ImageRef::default(),
                    address: test_address(),
                    created_by: "owner-1".to_string(),
                    likes: Vec::new(),
                    created_at: now,
                    updated_at: now,
                })
                .unwrap();
            }
        }

        let Json(res) = list_cards(State(state)).await.unwrap();
        let titles: Vec<_> = res.cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn update_by_non_owner_is_forbidden() {
        let (state, _dir) = test_state();
        seed_user(&state, "owner-1", "Dana").await;
        seed_user(&state, "other-1", "Noam").await;
        let card = create_for(&state, "owner-1", "Cafe Luna").await;

        let err = update_card(
            BusinessOrAdmin(caller("other-1", true, false)),
            Path(card.id.clone()),
            State(state),
            Ok(Json(card_payload("Hijacked"))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_may_update_any_card() {
        let (state, _dir) = test_state();
        seed_user(&state, "owner-1", "Dana").await;
        let card = create_for(&state, "owner-1", "Cafe Luna").await;

        let Json(res) = update_card(
            BusinessOrAdmin(caller("admin-1", false, true)),
            Path(card.id.clone()),
            State(state),
            Ok(Json(card_payload("Cafe Luna Renovated"))),
        )
        .await
        .expect("admin update succeeds");

        assert_eq!(res.card.title, "Cafe Luna Renovated");
        // Ownership survives the replace.
        assert_eq!(res.card.created_by.id, "owner-1");
    }

    #[tokio::test]
    async fn update_preserves_likes() {
        let (state, _dir) = test_state();
        seed_user(&state, "owner-1", "Dana").await;
        seed_user(&state, "fan-1", "Noam").await;
        let card = create_for(&state, "owner-1", "Cafe Luna").await;

        toggle_like(
            Auth(caller("fan-1", false, false)),
            Path(card.id.clone()),
            State(state.clone()),
        )
        .await
        .unwrap();

        let Json(res) = update_card(
            BusinessOrAdmin(caller("owner-1", true, false)),
            Path(card.id.clone()),
            State(state),
            Ok(Json(card_payload("Cafe Luna v2"))),
        )
        .await
        .unwrap();

        assert_eq!(res.card.likes.len(), 1);
        assert_eq!(res.card.likes[0].id, "fan-1");
    }

    #[tokio::test]
    async fn delete_by_non_owner_is_forbidden() {
        let (state, _dir) = test_state();
        seed_user(&state, "owner-1", "Dana").await;
        let card = create_for(&state, "owner-1", "Cafe Luna").await;

        let err = delete_card(
            BusinessOrAdmin(caller("other-1", true, false)),
            Path(card.id.clone()),
            State(state.clone()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        // Still there.
        assert!(get_card(Path(card.id), State(state)).await.is_ok());
    }

    #[tokio::test]
    async fn owner_delete_removes_card() {
        let (state, _dir) = test_state();
        seed_user(&state, "owner-1", "Dana").await;
        let card = create_for(&state, "owner-1", "Cafe Luna").await;

        delete_card(
            BusinessOrAdmin(caller("owner-1", true, false)),
            Path(card.id.clone()),
            State(state.clone()),
        )
        .await
        .expect("owner delete succeeds");

        let err = get_card(Path(card.id), State(state)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn like_toggle_round_trips() {
        let (state, _dir) = test_state();
        seed_user(&state, "owner-1", "Dana").await;
        seed_user(&state, "fan-1", "Noam").await;
        let card = create_for(&state, "owner-1", "Cafe Luna").await;

        let Json(liked) = toggle_like(
            Auth(caller("fan-1", false, false)),
            Path(card.id.clone()),
            State(state.clone()),
        )
        .await
        .unwrap();
        assert!(liked.is_liked);
        assert_eq!(liked.card.likes.len(), 1);

        let Json(unliked) = toggle_like(
            Auth(caller("fan-1", false, false)),
            Path(card.id.clone()),
            State(state),
        )
        .await
        .unwrap();
        assert!(!unliked.is_liked);
        assert!(unliked.card.likes.is_empty());
    }

    #[tokio::test]
    async fn owner_may_like_own_card() {
        let (state, _dir) = test_state();
        seed_user(&state, "owner-1", "Dana").await;
        let card = create_for(&state, "owner-1", "Cafe Luna").await;

        let Json(res) = toggle_like(
            Auth(caller("owner-1", true, false)),
            Path(card.id),
            State(state),
        )
        .await
        .unwrap();
        assert!(res.is_liked);
    }

    #[tokio::test]
    async fn my_cards_filters_to_caller() {
        let (state, _dir) = test_state();
        seed_user(&state, "owner-1", "Dana").await;
        seed_user(&state, "owner-2", "Noam").await;

        create_for(&state, "owner-1", "Mine One").await;
        create_for(&state, "owner-1", "Mine Two").await;
        create_for(&state, "owner-2", "Someone Else's").await;

        let Json(res) = list_my_cards(
            BusinessOnly(caller("owner-1", true, false)),
            State(state),
        )
        .await
        .unwrap();

        assert_eq!(res.cards.len(), 2);
        assert!(res.cards.iter().all(|c| c.created_by.id == "owner-1"));
    }
}
