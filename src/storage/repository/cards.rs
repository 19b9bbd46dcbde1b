// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

//! Card repository.
//!
//! Each business listing is stored as a separate JSON document under
//! `cards/`. The like toggle and the owner cascade run as single repository
//! calls; callers serialize them through the store write lock so concurrent
//! read-modify-write sequences cannot interleave.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Address, ImageRef};

use super::super::{DocumentStore, StorageError, StorageResult};

/// Card document as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredCard {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub description: String,
    pub phone: String,
    #[serde(default)]
    pub image: ImageRef,
    pub address: Address,
    /// Owning user id. Set once at creation, never from client input.
    pub created_by: String,
    /// User ids that liked this card; at most one entry per user.
    #[serde(default)]
    pub likes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for card operations on the document store.
pub struct CardRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> CardRepository<'a> {
    /// Create a new CardRepository.
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Check if a card exists.
    pub fn exists(&self, card_id: &str) -> bool {
        self.store.exists(self.store.paths().card(card_id))
    }

    /// Get a card by ID.
    pub fn get(&self, card_id: &str) -> StorageResult<StoredCard> {
        let path = self.store.paths().card(card_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("Card {card_id}")));
        }
        self.store.read_json(path)
    }

    /// Create a new card.
    pub fn create(&self, card: &StoredCard) -> StorageResult<()> {
        if self.exists(&card.id) {
            return Err(StorageError::AlreadyExists(format!("Card {}", card.id)));
        }

        self.store
            .write_json(self.store.paths().card(&card.id), card)
    }

    /// Update an existing card.
    pub fn update(&self, card: &StoredCard) -> StorageResult<()> {
        if !self.exists(&card.id) {
            return Err(StorageError::NotFound(format!("Card {}", card.id)));
        }

        self.store
            .write_json(self.store.paths().card(&card.id), card)
    }

    /// Delete a card.
    pub fn delete(&self, card_id: &str) -> StorageResult<()> {
        if !self.exists(card_id) {
            return Err(StorageError::NotFound(format!("Card {card_id}")));
        }

        self.store.delete(self.store.paths().card(card_id))
    }

    /// List all cards. Order is unspecified; callers sort.
    pub fn list_all(&self) -> StorageResult<Vec<StoredCard>> {
        let card_ids = self
            .store
            .list_files(self.store.paths().cards_dir(), "json")?;

        let mut cards = Vec::new();
        for id in card_ids {
            if let Ok(card) = self.get(&id) {
                cards.push(card);
            }
        }

        Ok(cards)
    }

    /// List all cards owned by a user.
    pub fn list_by_owner(&self, owner_id: &str) -> StorageResult<Vec<StoredCard>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|card| card.created_by == owner_id)
            .collect())
    }

    /// Toggle `user_id`'s membership in a card's like set.
    ///
    /// Returns the updated card and whether the caller now likes it. Must
    /// run under the store write lock: two concurrent toggles for the same
    /// user would otherwise both observe "not liked" and violate the
    /// at-most-once invariant.
    pub fn toggle_like(&self, card_id: &str, user_id: &str) -> StorageResult<(StoredCard, bool)> {
        let mut card = self.get(card_id)?;

        let was_liked = card.likes.iter().any(|id| id == user_id);
        if was_liked {
            card.likes.retain(|id| id != user_id);
        } else {
            card.likes.push(user_id.to_string());
        }
        card.updated_at = Utc::now();

        self.update(&card)?;
        Ok((card, !was_liked))
    }

    /// Delete every card owned by `owner_id`; returns how many were removed.
    ///
    /// Stops at the first failure so a partial cascade is observable to the
    /// caller.
    pub fn delete_by_owner(&self, owner_id: &str) -> StorageResult<usize> {
        let owned = self.list_by_owner(owner_id)?;
        let mut removed = 0;
        for card in &owned {
            self.delete(&card.id)?;
            removed += 1;
        }
        Ok(removed)
    }
}
