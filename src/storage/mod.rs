// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

//! # Persistence Module
//!
//! File-backed JSON document store plus per-collection repositories.
//!
//! ## Storage Layout
//!
//! ```text
//! <DATA_DIR>/
//!   users/
//!     {user_id}.json
//!   cards/
//!     {card_id}.json
//! ```
//!
//! A single document write is atomic (temp file + rename). There is no
//! multi-document transaction: sequences that touch more than one document
//! are serialized by holding the store write lock in
//! [`crate::state::AppState`] for the whole sequence.

pub mod document_fs;
pub mod paths;
pub mod repository;

pub use document_fs::{DocumentStore, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{CardRepository, StoredCard, StoredUser, UserRepository};
