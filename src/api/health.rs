// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok" when the document store round-trips, "degraded" otherwise.
    pub status: String,
}

/// Liveness probe with a store write-read-delete round trip.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = {
        let store = state.store.read().await;
        if store.health_check().is_ok() {
            "ok"
        } else {
            "degraded"
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
    })
}
