// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

//! Path utilities for the document store layout.
//!
//! ```text
//! <root>/
//!   users/{user_id}.json
//!   cards/{card_id}.json
//! ```

use std::path::{Path, PathBuf};

/// Path utilities for the document store.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    /// Create a new StoragePaths with the given root.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persistent data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== User Paths ==========

    /// Directory containing all user documents.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a specific user document.
    pub fn user(&self, user_id: &str) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    // ========== Card Paths ==========

    /// Directory containing all card documents.
    pub fn cards_dir(&self) -> PathBuf {
        self.root.join("cards")
    }

    /// Path to a specific card document.
    pub fn card(&self, card_id: &str) -> PathBuf {
        self.cards_dir().join(format!("{card_id}.json"))
    }
}
