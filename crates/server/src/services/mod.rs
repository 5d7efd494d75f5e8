//! Service layer between the HTTP handlers and the repositories.
//!
//! Services own lifecycle semantics (timestamp stamping, preserved fields on
//! update, not-found mapping) and delegate all persistence to the store
//! traits. They are generic over the store so tests can run against
//! in-memory doubles.

pub mod cards;
pub mod owners;

pub use cards::CardService;
pub use owners::OwnerService;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod testing {
    //! In-memory store doubles enforcing the same unique constraints as the
    //! real collections.

    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::stream::{self, BoxStream, StreamExt};

    use cardfolio_core::{CardId, OwnerId};

    use crate::db::{CardStore, OwnerStore, RepositoryError};
    use crate::models::{Card, Owner};

    #[derive(Default)]
    pub struct MemoryCardStore {
        inner: Mutex<MemoryCards>,
    }

    #[derive(Default)]
    struct MemoryCards {
        cards: Vec<Card>,
        next_id: u64,
    }

    #[async_trait]
    impl CardStore for MemoryCardStore {
        async fn save(&self, mut card: Card) -> Result<Card, RepositoryError> {
            let mut inner = self.inner.lock().unwrap();
            let duplicate = inner.cards.iter().any(|existing| {
                existing.id != card.id && existing.name == card.name && existing.set == card.set
            });
            if duplicate {
                return Err(RepositoryError::Conflict(
                    "a card with this name and set already exists".to_owned(),
                ));
            }
            match card.id.clone() {
                None => {
                    inner.next_id += 1;
                    card.id = Some(CardId::new(format!("card-{}", inner.next_id)));
                    inner.cards.push(card.clone());
                    Ok(card)
                }
                Some(id) => {
                    if let Some(slot) = inner
                        .cards
                        .iter_mut()
                        .find(|existing| existing.id.as_ref() == Some(&id))
                    {
                        *slot = card.clone();
                    }
                    Ok(card)
                }
            }
        }

        async fn find_by_id(&self, id: &CardId) -> Result<Option<Card>, RepositoryError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .cards
                .iter()
                .find(|card| card.id.as_ref() == Some(id))
                .cloned())
        }

        async fn find_all(
            &self,
        ) -> Result<BoxStream<'static, Result<Card, RepositoryError>>, RepositoryError> {
            let cards = self.inner.lock().unwrap().cards.clone();
            Ok(stream::iter(cards.into_iter().map(Ok)).boxed())
        }

        async fn find_by_type(&self, card_type: &str) -> Result<Vec<Card>, RepositoryError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .cards
                .iter()
                .filter(|card| card.card_type == card_type)
                .cloned()
                .collect())
        }

        async fn find_by_rarity(&self, rarity: &str) -> Result<Vec<Card>, RepositoryError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .cards
                .iter()
                .filter(|card| card.rarity == rarity)
                .cloned()
                .collect())
        }

        async fn find_by_set(&self, set: &str) -> Result<Vec<Card>, RepositoryError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .cards
                .iter()
                .filter(|card| card.set == set)
                .cloned()
                .collect())
        }

        async fn search_by_name(&self, name: &str) -> Result<Vec<Card>, RepositoryError> {
            let needle = name.to_lowercase();
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .cards
                .iter()
                .filter(|card| card.name.to_lowercase().contains(&needle))
                .cloned()
                .collect())
        }

        async fn delete_by_id(&self, id: &CardId) -> Result<bool, RepositoryError> {
            let mut inner = self.inner.lock().unwrap();
            let before = inner.cards.len();
            inner.cards.retain(|card| card.id.as_ref() != Some(id));
            Ok(inner.cards.len() < before)
        }

        async fn count(&self) -> Result<u64, RepositoryError> {
            Ok(self.inner.lock().unwrap().cards.len() as u64)
        }
    }

    #[derive(Default)]
    pub struct MemoryOwnerStore {
        inner: Mutex<MemoryOwners>,
    }

    #[derive(Default)]
    struct MemoryOwners {
        owners: Vec<Owner>,
        next_id: u64,
    }

    #[async_trait]
    impl OwnerStore for MemoryOwnerStore {
        async fn save(&self, mut owner: Owner) -> Result<Owner, RepositoryError> {
            let mut inner = self.inner.lock().unwrap();
            let duplicate = inner
                .owners
                .iter()
                .any(|existing| existing.id != owner.id && existing.email == owner.email);
            if duplicate {
                return Err(RepositoryError::Conflict(
                    "an owner with this email already exists".to_owned(),
                ));
            }
            match owner.id.clone() {
                None => {
                    inner.next_id += 1;
                    owner.id = Some(OwnerId::new(format!("owner-{}", inner.next_id)));
                    inner.owners.push(owner.clone());
                    Ok(owner)
                }
                Some(id) => {
                    if let Some(slot) = inner
                        .owners
                        .iter_mut()
                        .find(|existing| existing.id.as_ref() == Some(&id))
                    {
                        *slot = owner.clone();
                    }
                    Ok(owner)
                }
            }
        }

        async fn find_by_id(&self, id: &OwnerId) -> Result<Option<Owner>, RepositoryError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .owners
                .iter()
                .find(|owner| owner.id.as_ref() == Some(id))
                .cloned())
        }

        async fn find_all(
            &self,
        ) -> Result<BoxStream<'static, Result<Owner, RepositoryError>>, RepositoryError> {
            let owners = self.inner.lock().unwrap().owners.clone();
            Ok(stream::iter(owners.into_iter().map(Ok)).boxed())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Owner>, RepositoryError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .owners
                .iter()
                .find(|owner| owner.email.as_str() == email)
                .cloned())
        }

        async fn find_by_last_name(
            &self,
            last_name: &str,
        ) -> Result<Vec<Owner>, RepositoryError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .owners
                .iter()
                .filter(|owner| owner.last_name == last_name)
                .cloned()
                .collect())
        }

        async fn find_by_owned_card(
            &self,
            card_id: &CardId,
        ) -> Result<Vec<Owner>, RepositoryError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .owners
                .iter()
                .filter(|owner| owner.owned_card_ids.contains(card_id))
                .cloned()
                .collect())
        }

        async fn delete_by_id(&self, id: &OwnerId) -> Result<bool, RepositoryError> {
            let mut inner = self.inner.lock().unwrap();
            let before = inner.owners.len();
            inner.owners.retain(|owner| owner.id.as_ref() != Some(id));
            Ok(inner.owners.len() < before)
        }

        async fn count(&self) -> Result<u64, RepositoryError> {
            Ok(self.inner.lock().unwrap().owners.len() as u64)
        }
    }
}
