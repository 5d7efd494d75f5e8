//! Card lifecycle operations.

use chrono::Utc;
use futures::stream::BoxStream;

use cardfolio_core::CardId;

use crate::db::{CardStore, RepositoryError};
use crate::models::{Card, CardDraft};

/// Card service over any [`CardStore`].
#[derive(Clone)]
pub struct CardService<S> {
    store: S,
}

impl<S: CardStore> CardService<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a card from a draft. Both timestamps are stamped to the same
    /// instant; the store assigns the identity.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] if a card with the same name
    /// and set already exists.
    pub async fn create(&self, draft: CardDraft) -> Result<Card, RepositoryError> {
        self.store.save(Card::from_draft(draft, Utc::now())).await
    }

    /// Replace an existing card's content with a draft.
    ///
    /// The identity and original `created_at` are preserved; `updated_at` is
    /// stamped to now. Last write wins between concurrent updates.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the card does not exist, and
    /// [`RepositoryError::Conflict`] if the new name and set collide with
    /// another card.
    pub async fn update(&self, id: &CardId, draft: CardDraft) -> Result<Card, RepositoryError> {
        let existing = self.get(id).await?;
        let mut card = Card::from_draft(draft, Utc::now());
        card.id = existing.id;
        card.created_at = existing.created_at;
        self.store.save(card).await
    }

    /// Fetch a card by identity.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the card does not exist.
    pub async fn get(&self, id: &CardId) -> Result<Card, RepositoryError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// All cards as a lazy stream.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] if the store cannot open a cursor.
    pub async fn list(
        &self,
    ) -> Result<BoxStream<'static, Result<Card, RepositoryError>>, RepositoryError> {
        self.store.find_all().await
    }

    /// Cards with an exact-matching type.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] on a store failure.
    pub async fn find_by_type(&self, card_type: &str) -> Result<Vec<Card>, RepositoryError> {
        self.store.find_by_type(card_type).await
    }

    /// Cards with an exact-matching rarity.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] on a store failure.
    pub async fn find_by_rarity(&self, rarity: &str) -> Result<Vec<Card>, RepositoryError> {
        self.store.find_by_rarity(rarity).await
    }

    /// Cards from an exact-matching set.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] on a store failure.
    pub async fn find_by_set(&self, set: &str) -> Result<Vec<Card>, RepositoryError> {
        self.store.find_by_set(set).await
    }

    /// Case-insensitive substring search on card names.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] on a store failure.
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Card>, RepositoryError> {
        self.store.search_by_name(name).await
    }

    /// Delete a card by identity.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the card does not exist.
    pub async fn delete(&self, id: &CardId) -> Result<(), RepositoryError> {
        if self.store.delete_by_id(id).await? {
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    /// Approximate number of cards.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] on a store failure.
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        self.store.count().await
    }
}
