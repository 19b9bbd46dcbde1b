// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::TokenService;
use crate::storage::DocumentStore;

/// Shared application state, cloned into every handler.
///
/// The store lock is the concurrency boundary: reads take the read lock,
/// and every mutation holds the write lock for its whole read-modify-write
/// sequence (like toggles, cascade deletes).
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<DocumentStore>>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(store: DocumentStore, tokens: TokenService) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            tokens,
        }
    }
}
