// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

//! HTTP client for the directory API.
//!
//! [`DirectoryClient`] is the client tier at its interface boundary: it
//! holds the session token and a snapshot of the current user, and exposes
//! one method per API operation. Rendering is out of scope; frontends build
//! on top of this.

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{
    AdminStatsResponse, AuthResponse, CardListResponse, CardMessageResponse, CardPayload,
    CardResponse, CardView, CurrentUserResponse, LikeResponse, LoginRequest, MessageResponse,
    PublicUser, RegisterRequest, UserListResponse, UserMessageResponse,
};

/// Client-side error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connection, TLS, decoding).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// A protected operation was attempted without a session.
    #[error("not authenticated; call register or login first")]
    NotAuthenticated,
}

/// Stateful API client: base URL, session token, current-user snapshot.
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    current_user: Option<PublicUser>,
}

impl DirectoryClient {
    /// Create a client against a server base URL (e.g. `http://localhost:3000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
            current_user: None,
        }
    }

    /// The held session token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The locally cached user snapshot, if any.
    ///
    /// Refreshed by `register`, `login`, and `me`; may lag the server
    /// otherwise.
    pub fn current_user(&self) -> Option<&PublicUser> {
        self.current_user.as_ref()
    }

    /// Drop the session token and user snapshot. Purely local; tokens are
    /// stateless and cannot be revoked server-side.
    pub fn logout(&mut self) {
        self.token = None;
        self.current_user = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn bearer(&self) -> Result<&str, ClientError> {
        self.token.as_deref().ok_or(ClientError::NotAuthenticated)
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("error")
                    .and_then(|e| e.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| status.to_string());

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    // ========== Sessions ==========

    /// Register an account and adopt the returned session.
    pub async fn register(&mut self, request: &RegisterRequest) -> Result<PublicUser, ClientError> {
        let response = self
            .http
            .post(self.url("/users"))
            .json(request)
            .send()
            .await?;
        let auth: AuthResponse = Self::parse(response).await?;

        self.token = Some(auth.token);
        self.current_user = Some(auth.user.clone());
        Ok(auth.user)
    }

    /// Log in and adopt the returned session.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<PublicUser, ClientError> {
        let response = self
            .http
            .post(self.url("/users/login"))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let auth: AuthResponse = Self::parse(response).await?;

        self.token = Some(auth.token);
        self.current_user = Some(auth.user.clone());
        Ok(auth.user)
    }

    /// Fetch the server-side view of the current user and refresh the
    /// local snapshot.
    pub async fn me(&mut self) -> Result<PublicUser, ClientError> {
        let token = self.bearer()?.to_string();
        let response = self
            .http
            .get(self.url("/users/me"))
            .bearer_auth(token)
            .send()
            .await?;
        let current: CurrentUserResponse = Self::parse(response).await?;

        self.current_user = Some(current.user.clone());
        Ok(current.user)
    }

    // ========== Cards ==========

    /// List all listings. Public.
    pub async fn list_cards(&self) -> Result<Vec<CardView>, ClientError> {
        let response = self.http.get(self.url("/cards")).send().await?;
        let list: CardListResponse = Self::parse(response).await?;
        Ok(list.cards)
    }

    /// Fetch one listing. Public.
    pub async fn get_card(&self, card_id: &str) -> Result<CardView, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/cards/{card_id}")))
            .send()
            .await?;
        let card: CardResponse = Self::parse(response).await?;
        Ok(card.card)
    }

    /// Create a listing (business accounts).
    pub async fn create_card(&self, payload: &CardPayload) -> Result<CardView, ClientError> {
        let response = self
            .http
            .post(self.url("/cards"))
            .bearer_auth(self.bearer()?)
            .json(payload)
            .send()
            .await?;
        let created: CardMessageResponse = Self::parse(response).await?;
        Ok(created.card)
    }

    /// Replace a listing's editable fields (owner or admin).
    pub async fn update_card(
        &self,
        card_id: &str,
        payload: &CardPayload,
    ) -> Result<CardView, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/cards/{card_id}")))
            .bearer_auth(self.bearer()?)
            .json(payload)
            .send()
            .await?;
        let updated: CardMessageResponse = Self::parse(response).await?;
        Ok(updated.card)
    }

    /// Delete a listing (owner or admin).
    pub async fn delete_card(&self, card_id: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/cards/{card_id}")))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        let deleted: MessageResponse = Self::parse(response).await?;
        Ok(deleted.msg)
    }

    /// Toggle the caller's like on a listing.
    pub async fn toggle_like(&self, card_id: &str) -> Result<LikeResponse, ClientError> {
        let response = self
            .http
            .patch(self.url(&format!("/cards/{card_id}/like")))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// List the caller's own listings (business accounts).
    pub async fn my_cards(&self) -> Result<Vec<CardView>, ClientError> {
        let response = self
            .http
            .get(self.url("/cards/my/cards"))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        let list: CardListResponse = Self::parse(response).await?;
        Ok(list.cards)
    }

    // ========== Admin ==========

    /// List all users (admin).
    pub async fn admin_list_users(&self) -> Result<Vec<PublicUser>, ClientError> {
        let response = self
            .http
            .get(self.url("/admin/users"))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        let list: UserListResponse = Self::parse(response).await?;
        Ok(list.users)
    }

    /// Delete a user and their listings (admin).
    pub async fn admin_delete_user(&self, user_id: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/admin/users/{user_id}")))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        let deleted: MessageResponse = Self::parse(response).await?;
        Ok(deleted.msg)
    }

    /// Flip another user's admin flag (admin).
    pub async fn admin_toggle_admin(&self, user_id: &str) -> Result<PublicUser, ClientError> {
        let response = self
            .http
            .patch(self.url(&format!("/admin/users/{user_id}/toggle-admin")))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        let toggled: UserMessageResponse = Self::parse(response).await?;
        Ok(toggled.user)
    }

    /// Dashboard statistics (admin).
    pub async fn admin_stats(&self) -> Result<AdminStatsResponse, ClientError> {
        let response = self
            .http
            .get(self.url("/admin/stats"))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        Self::parse(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_client_has_no_session() {
        let client = DirectoryClient::new("http://localhost:3000");
        assert!(client.token().is_none());
        assert!(client.current_user().is_none());
    }

    #[tokio::test]
    async fn url_joins_without_double_slashes() {
        let client = DirectoryClient::new("http://localhost:3000/");
        assert_eq!(client.url("/cards"), "http://localhost:3000/cards");

        let client = DirectoryClient::new("http://localhost:3000");
        assert_eq!(client.url("/cards"), "http://localhost:3000/cards");
    }

    #[tokio::test]
    async fn protected_calls_fail_fast_without_session() {
        let mut client = DirectoryClient::new("http://localhost:3000");

        // No network involved: the token check runs first.
        assert!(matches!(
            client.me().await,
            Err(ClientError::NotAuthenticated)
        ));
        assert!(matches!(
            client.my_cards().await,
            Err(ClientError::NotAuthenticated)
        ));
        assert!(matches!(
            client.admin_stats().await,
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn logout_clears_session_state() {
        let mut client = DirectoryClient::new("http://localhost:3000");
        client.token = Some("token".to_string());
        client.logout();
        assert!(client.token().is_none());
        assert!(client.current_user().is_none());
    }
}
