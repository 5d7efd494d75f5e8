//! Application state shared across handlers.

use std::sync::Arc;

use mongodb::Database;

use crate::config::ServerConfig;
use crate::db::{CardRepository, IndexInspector, OwnerRepository};
use crate::services::{CardService, OwnerService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database handle and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    database: Database,
    cards: CardService<CardRepository>,
    owners: OwnerService<OwnerRepository>,
    inspector: IndexInspector,
}

impl AppState {
    /// Create a new application state over a connected database.
    #[must_use]
    pub fn new(config: ServerConfig, database: Database) -> Self {
        let cards = CardService::new(CardRepository::new(&database));
        let owners = OwnerService::new(OwnerRepository::new(&database));
        let inspector = IndexInspector::new(database.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                database,
                cards,
                owners,
                inspector,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog database handle.
    #[must_use]
    pub fn database(&self) -> &Database {
        &self.inner.database
    }

    /// Get a reference to the card service.
    #[must_use]
    pub fn cards(&self) -> &CardService<CardRepository> {
        &self.inner.cards
    }

    /// Get a reference to the owner service.
    #[must_use]
    pub fn owners(&self) -> &OwnerService<OwnerRepository> {
        &self.inner.owners
    }

    /// Get a reference to the index inspector.
    #[must_use]
    pub fn inspector(&self) -> &IndexInspector {
        &self.inner.inspector
    }
}
