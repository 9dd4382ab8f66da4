//! Generation identity.
//!
//! Exactly one generation is current for the process lifetime of one
//! loaded controller. The token is supplied externally (deploy-time); it
//! supersedes prior tokens by policy, not by automatic versioning. Every
//! component that needs to know "which store" depends on a manager
//! instance rather than ambient state.

use swcache_core::{Error, GenerationStore, StoreDb};

/// Owns the current generation token and store access.
#[derive(Clone, Debug)]
pub struct GenerationManager {
    token: String,
    db: StoreDb,
}

impl GenerationManager {
    pub fn new(db: StoreDb, token: impl Into<String>) -> Self {
        Self { token: token.into(), db }
    }

    /// The current generation token.
    pub fn current(&self) -> &str {
        &self.token
    }

    /// The underlying store database.
    pub fn db(&self) -> &StoreDb {
        &self.db
    }

    /// Create-or-open the current generation's store.
    pub async fn open_current_store(&self) -> Result<GenerationStore, Error> {
        self.db.open_store(&self.token).await
    }

    /// Create-or-open an arbitrary named store.
    pub async fn open_store(&self, token: &str) -> Result<GenerationStore, Error> {
        self.db.open_store(token).await
    }
}
