//! Card repository for document-store operations.
//!
//! The [`CardStore`] trait is the seam the service layer talks to; the
//! MongoDB implementation is [`CardRepository`]. Storage documents keep the
//! driver-native types (`ObjectId`, `bson::DateTime`, `Decimal128`) and are
//! mapped fallibly to the domain model - unreadable stored data surfaces as
//! [`RepositoryError::DataCorruption`], never a panic.

use std::str::FromStr;

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Decimal128, Document, doc};
use mongodb::{Collection, Database};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cardfolio_core::{CardId, Price};

use super::{CARDS_COLLECTION, RepositoryError, conflict_on_duplicate, parse_object_id};
use crate::models::Card;

/// Message surfaced when the unique `(name, set)` index rejects a write.
const DUPLICATE_CARD: &str = "a card with this name and set already exists";

/// Storage contract for cards.
///
/// `save` owns the upsert-vs-insert decision: entities without identity are
/// inserted (the store assigns the key), entities with identity are replaced
/// whole by key.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Insert or fully replace a card; returns it as persisted, with the
    /// identity populated on insert.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] if the unique `(name, set)`
    /// index would be violated.
    async fn save(&self, card: Card) -> Result<Card, RepositoryError>;

    /// Look a card up by identity.
    async fn find_by_id(&self, id: &CardId) -> Result<Option<Card>, RepositoryError>;

    /// All cards as a lazy stream in store-native order. Finite, not
    /// restartable mid-stream; a fresh call re-reads from the store.
    async fn find_all(&self)
    -> Result<BoxStream<'static, Result<Card, RepositoryError>>, RepositoryError>;

    /// Cards with an exact-matching type.
    async fn find_by_type(&self, card_type: &str) -> Result<Vec<Card>, RepositoryError>;

    /// Cards with an exact-matching rarity.
    async fn find_by_rarity(&self, rarity: &str) -> Result<Vec<Card>, RepositoryError>;

    /// Cards from an exact-matching set.
    async fn find_by_set(&self, set: &str) -> Result<Vec<Card>, RepositoryError>;

    /// Case-insensitive substring match on the card name. A collection scan,
    /// not a full-text index.
    async fn search_by_name(&self, name: &str) -> Result<Vec<Card>, RepositoryError>;

    /// Physically delete a card by identity. Returns whether a document was
    /// deleted; the service layer owns the not-found mapping.
    async fn delete_by_id(&self, id: &CardId) -> Result<bool, RepositoryError>;

    /// Approximate collection cardinality.
    async fn count(&self) -> Result<u64, RepositoryError>;
}

/// Stored shape of a card in `pokemon_cards`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
    #[serde(rename = "type")]
    card_type: String,
    hp: i32,
    rarity: String,
    set: String,
    market_price: Decimal128,
    abilities: Vec<String>,
    created_at: mongodb::bson::DateTime,
    updated_at: mongodb::bson::DateTime,
}

impl CardDocument {
    fn from_domain(card: &Card) -> Result<Self, RepositoryError> {
        let id = card
            .id
            .as_ref()
            .map(|id| parse_object_id(id.as_str()))
            .transpose()?;
        Ok(Self {
            id,
            name: card.name.clone(),
            card_type: card.card_type.clone(),
            hp: card.hp,
            rarity: card.rarity.clone(),
            set: card.set.clone(),
            market_price: encode_price(card.market_price)?,
            abilities: card.abilities.clone(),
            created_at: mongodb::bson::DateTime::from_chrono(card.created_at),
            updated_at: mongodb::bson::DateTime::from_chrono(card.updated_at),
        })
    }

    fn into_domain(self) -> Result<Card, RepositoryError> {
        Ok(Card {
            id: self.id.map(|oid| CardId::new(oid.to_hex())),
            name: self.name,
            card_type: self.card_type,
            hp: self.hp,
            rarity: self.rarity,
            set: self.set,
            market_price: decode_price(self.market_price)?,
            abilities: self.abilities,
            created_at: self.created_at.to_chrono(),
            updated_at: self.updated_at.to_chrono(),
        })
    }
}

fn encode_price(price: Price) -> Result<Decimal128, RepositoryError> {
    Decimal128::from_str(&price.amount().to_string()).map_err(|e| {
        RepositoryError::DataCorruption(format!("unrepresentable market price {price}: {e}"))
    })
}

fn decode_price(raw: Decimal128) -> Result<Price, RepositoryError> {
    let amount = Decimal::from_str(&raw.to_string())
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid market price {raw}: {e}")))?;
    Price::new(amount)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid market price: {e}")))
}

/// MongoDB-backed card repository.
#[derive(Clone)]
pub struct CardRepository {
    collection: Collection<CardDocument>,
}

impl CardRepository {
    /// Create a repository over the `pokemon_cards` collection.
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(CARDS_COLLECTION),
        }
    }

    async fn find_matching(&self, filter: Document) -> Result<Vec<Card>, RepositoryError> {
        let mut cursor = self.collection.find(filter).await?;
        let mut cards = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            cards.push(document.into_domain()?);
        }
        Ok(cards)
    }
}

#[async_trait]
impl CardStore for CardRepository {
    async fn save(&self, mut card: Card) -> Result<Card, RepositoryError> {
        match card.id.clone() {
            None => {
                let document = CardDocument::from_domain(&card)?;
                let result = self
                    .collection
                    .insert_one(&document)
                    .await
                    .map_err(|e| conflict_on_duplicate(e, DUPLICATE_CARD))?;
                let oid = result.inserted_id.as_object_id().ok_or_else(|| {
                    RepositoryError::DataCorruption("store assigned a non-ObjectId key".to_owned())
                })?;
                card.id = Some(CardId::new(oid.to_hex()));
                Ok(card)
            }
            Some(id) => {
                let oid = parse_object_id(id.as_str())?;
                let document = CardDocument::from_domain(&card)?;
                self.collection
                    .replace_one(doc! { "_id": oid }, &document)
                    .await
                    .map_err(|e| conflict_on_duplicate(e, DUPLICATE_CARD))?;
                Ok(card)
            }
        }
    }

    async fn find_by_id(&self, id: &CardId) -> Result<Option<Card>, RepositoryError> {
        let oid = parse_object_id(id.as_str())?;
        let document = self.collection.find_one(doc! { "_id": oid }).await?;
        document.map(CardDocument::into_domain).transpose()
    }

    async fn find_all(
        &self,
    ) -> Result<BoxStream<'static, Result<Card, RepositoryError>>, RepositoryError> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor
            .map(|result| {
                result
                    .map_err(RepositoryError::from)
                    .and_then(CardDocument::into_domain)
            })
            .boxed())
    }

    async fn find_by_type(&self, card_type: &str) -> Result<Vec<Card>, RepositoryError> {
        self.find_matching(doc! { "type": card_type }).await
    }

    async fn find_by_rarity(&self, rarity: &str) -> Result<Vec<Card>, RepositoryError> {
        self.find_matching(doc! { "rarity": rarity }).await
    }

    async fn find_by_set(&self, set: &str) -> Result<Vec<Card>, RepositoryError> {
        self.find_matching(doc! { "set": set }).await
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<Card>, RepositoryError> {
        self.find_matching(doc! { "name": { "$regex": name, "$options": "i" } })
            .await
    }

    async fn delete_by_id(&self, id: &CardId) -> Result<bool, RepositoryError> {
        let oid = parse_object_id(id.as_str())?;
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.collection.estimated_document_count().await?)
    }
}
