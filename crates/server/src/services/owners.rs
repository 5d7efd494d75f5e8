//! Owner lifecycle operations, including the owned-card list.

use chrono::Utc;
use futures::stream::BoxStream;

use cardfolio_core::{CardId, OwnerId};

use crate::db::{OwnerStore, RepositoryError};
use crate::models::{Owner, OwnerDraft};

/// Owner service over any [`OwnerStore`].
#[derive(Clone)]
pub struct OwnerService<S> {
    store: S,
}

impl<S: OwnerStore> OwnerService<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Create an owner from a draft. Both timestamps are stamped to the same
    /// instant; the store assigns the identity.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] if an owner with the same email
    /// already exists.
    pub async fn create(&self, draft: OwnerDraft) -> Result<Owner, RepositoryError> {
        self.store.save(Owner::from_draft(draft, Utc::now())).await
    }

    /// Replace an existing owner's content with a draft.
    ///
    /// The identity and original `created_at` are preserved; `updated_at` is
    /// stamped to now. The owned-card list is replaced wholesale by the
    /// draft's list.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the owner does not exist,
    /// and [`RepositoryError::Conflict`] if the new email collides with
    /// another owner.
    pub async fn update(&self, id: &OwnerId, draft: OwnerDraft) -> Result<Owner, RepositoryError> {
        let existing = self.get(id).await?;
        let mut owner = Owner::from_draft(draft, Utc::now());
        owner.id = existing.id;
        owner.created_at = existing.created_at;
        self.store.save(owner).await
    }

    /// Fetch an owner by identity.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the owner does not exist.
    pub async fn get(&self, id: &OwnerId) -> Result<Owner, RepositoryError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// All owners as a lazy stream.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] if the store cannot open a cursor.
    pub async fn list(
        &self,
    ) -> Result<BoxStream<'static, Result<Owner, RepositoryError>>, RepositoryError> {
        self.store.find_all().await
    }

    /// The owner with an exact-matching email.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no owner has this email.
    pub async fn get_by_email(&self, email: &str) -> Result<Owner, RepositoryError> {
        self.store
            .find_by_email(email)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Owners with an exact-matching last name.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] on a store failure.
    pub async fn find_by_last_name(&self, last_name: &str) -> Result<Vec<Owner>, RepositoryError> {
        self.store.find_by_last_name(last_name).await
    }

    /// Owners whose collection contains the given card.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] on a store failure.
    pub async fn find_by_owned_card(
        &self,
        card_id: &CardId,
    ) -> Result<Vec<Owner>, RepositoryError> {
        self.store.find_by_owned_card(card_id).await
    }

    /// Delete an owner by identity.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the owner does not exist.
    pub async fn delete(&self, id: &OwnerId) -> Result<(), RepositoryError> {
        if self.store.delete_by_id(id).await? {
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    /// Approximate number of owners.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] on a store failure.
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        self.store.count().await
    }

    /// Add a card to an owner's collection. Idempotent: a card already
    /// present is not duplicated. The card id is not checked against the
    /// card collection.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the owner does not exist.
    pub async fn add_card(
        &self,
        owner_id: &OwnerId,
        card_id: CardId,
    ) -> Result<Owner, RepositoryError> {
        let mut owner = self.get(owner_id).await?;
        if !owner.owned_card_ids.contains(&card_id) {
            owner.owned_card_ids.push(card_id);
            owner.updated_at = Utc::now();
        }
        self.store.save(owner).await
    }

    /// Remove a card from an owner's collection. Removing a card that is
    /// not present leaves the list unchanged and still succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the owner does not exist.
    pub async fn remove_card(
        &self,
        owner_id: &OwnerId,
        card_id: &CardId,
    ) -> Result<Owner, RepositoryError> {
        let mut owner = self.get(owner_id).await?;
        if let Some(position) = owner.owned_card_ids.iter().position(|id| id == card_id) {
            owner.owned_card_ids.remove(position);
            owner.updated_at = Utc::now();
        }
        self.store.save(owner).await
    }
}
