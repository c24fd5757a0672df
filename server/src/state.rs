//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! owns the record store explicitly; nothing reaches a process-wide global,
//! so each test builds its own isolated state.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::store::{MemoryStore, RecordStore};

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, config: ServerConfig) -> Self {
        Self { store, config: Arc::new(config) }
    }

    /// State backed by a fresh in-memory store.
    #[must_use]
    pub fn in_memory(config: ServerConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }
}
