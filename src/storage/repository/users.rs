// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

//! User repository.
//!
//! Each user is stored as a separate JSON document under `users/`. The
//! normalized (lowercased) email is the login key; uniqueness is enforced
//! here at insert time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Address, ImageRef};

use super::super::{DocumentStore, StorageError, StorageResult};

/// User document as persisted. The password is held only as an Argon2 PHC
/// hash; API views are derived via [`crate::models::PublicUser`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub id: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    pub last_name: String,
    pub phone: String,
    /// Normalized login key (trimmed, NFKC, lowercased).
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub image: ImageRef,
    pub address: Address,
    pub is_business: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for user operations on the document store.
pub struct UserRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Check if a user exists.
    pub fn exists(&self, user_id: &str) -> bool {
        self.store.exists(self.store.paths().user(user_id))
    }

    /// Get a user by ID.
    pub fn get(&self, user_id: &str) -> StorageResult<StoredUser> {
        let path = self.store.paths().user(user_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.store.read_json(path)
    }

    /// Look up a user by normalized email.
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<StoredUser>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|user| user.email == email))
    }

    /// Create a new user.
    ///
    /// Fails with `AlreadyExists` when the id or the normalized email is
    /// already taken.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        if self.exists(&user.id) {
            return Err(StorageError::AlreadyExists(format!("User {}", user.id)));
        }

        if self.find_by_email(&user.email)?.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "User with email {}",
                user.email
            )));
        }

        self.store
            .write_json(self.store.paths().user(&user.id), user)
    }

    /// Update an existing user.
    pub fn update(&self, user: &StoredUser) -> StorageResult<()> {
        if !self.exists(&user.id) {
            return Err(StorageError::NotFound(format!("User {}", user.id)));
        }

        self.store
            .write_json(self.store.paths().user(&user.id), user)
    }

    /// Delete a user.
    pub fn delete(&self, user_id: &str) -> StorageResult<()> {
        if !self.exists(user_id) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }

        self.store.delete(self.store.paths().user(user_id))
    }

    /// List all users. Order is unspecified; callers sort.
    pub fn list_all(&self) -> StorageResult<Vec<StoredUser>> {
        let user_ids = self
            .store
            .list_files(self.store.paths().users_dir(), "json")?;

        let mut users = Vec::new();
        for id in user_ids {
            if let Ok(user) = self.get(&id) {
                users.push(user);
            }
        }

        Ok(users)
    }
}
