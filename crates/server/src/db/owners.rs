//! Owner repository for document-store operations.
//!
//! Same shape as the card repository: [`OwnerStore`] is the trait seam,
//! [`OwnerRepository`] the MongoDB implementation.

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use cardfolio_core::{CardId, Email, OwnerId};

use super::{OWNERS_COLLECTION, RepositoryError, conflict_on_duplicate, parse_object_id};
use crate::models::{Address, Owner};

/// Message surfaced when the unique email index rejects a write.
const DUPLICATE_OWNER: &str = "an owner with this email already exists";

/// Storage contract for owners.
#[async_trait]
pub trait OwnerStore: Send + Sync {
    /// Insert or fully replace an owner; returns it as persisted, with the
    /// identity populated on insert.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] if the unique email index would
    /// be violated.
    async fn save(&self, owner: Owner) -> Result<Owner, RepositoryError>;

    /// Look an owner up by identity.
    async fn find_by_id(&self, id: &OwnerId) -> Result<Option<Owner>, RepositoryError>;

    /// All owners as a lazy stream in store-native order.
    async fn find_all(&self)
    -> Result<BoxStream<'static, Result<Owner, RepositoryError>>, RepositoryError>;

    /// The single owner with an exact-matching email, if any.
    async fn find_by_email(&self, email: &str) -> Result<Option<Owner>, RepositoryError>;

    /// Owners with an exact-matching last name.
    async fn find_by_last_name(&self, last_name: &str) -> Result<Vec<Owner>, RepositoryError>;

    /// Owners whose `ownedCardIds` list contains the given card id. Served
    /// by the single-field index on `ownedCardIds`.
    async fn find_by_owned_card(&self, card_id: &CardId) -> Result<Vec<Owner>, RepositoryError>;

    /// Physically delete an owner by identity. Returns whether a document
    /// was deleted; the service layer owns the not-found mapping.
    async fn delete_by_id(&self, id: &OwnerId) -> Result<bool, RepositoryError>;

    /// Approximate collection cardinality.
    async fn count(&self) -> Result<u64, RepositoryError>;
}

/// Stored shape of an owner in `card_owners`.
///
/// The email is stored as a plain string; re-validation on read maps a bad
/// stored value to `DataCorruption`. The embedded address and the card id
/// list serialize identically in BSON and JSON, so the domain types are
/// stored as-is.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnerDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    address: Address,
    owned_card_ids: Vec<CardId>,
    created_at: mongodb::bson::DateTime,
    updated_at: mongodb::bson::DateTime,
}

impl OwnerDocument {
    fn from_domain(owner: &Owner) -> Result<Self, RepositoryError> {
        let id = owner
            .id
            .as_ref()
            .map(|id| parse_object_id(id.as_str()))
            .transpose()?;
        Ok(Self {
            id,
            first_name: owner.first_name.clone(),
            last_name: owner.last_name.clone(),
            email: owner.email.as_str().to_owned(),
            phone_number: owner.phone_number.clone(),
            address: owner.address.clone(),
            owned_card_ids: owner.owned_card_ids.clone(),
            created_at: mongodb::bson::DateTime::from_chrono(owner.created_at),
            updated_at: mongodb::bson::DateTime::from_chrono(owner.updated_at),
        })
    }

    fn into_domain(self) -> Result<Owner, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in store: {e}"))
        })?;
        Ok(Owner {
            id: self.id.map(|oid| OwnerId::new(oid.to_hex())),
            first_name: self.first_name,
            last_name: self.last_name,
            email,
            phone_number: self.phone_number,
            address: self.address,
            owned_card_ids: self.owned_card_ids,
            created_at: self.created_at.to_chrono(),
            updated_at: self.updated_at.to_chrono(),
        })
    }
}

/// MongoDB-backed owner repository.
#[derive(Clone)]
pub struct OwnerRepository {
    collection: Collection<OwnerDocument>,
}

impl OwnerRepository {
    /// Create a repository over the `card_owners` collection.
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(OWNERS_COLLECTION),
        }
    }

    async fn find_matching(&self, filter: Document) -> Result<Vec<Owner>, RepositoryError> {
        let mut cursor = self.collection.find(filter).await?;
        let mut owners = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            owners.push(document.into_domain()?);
        }
        Ok(owners)
    }
}

#[async_trait]
impl OwnerStore for OwnerRepository {
    async fn save(&self, mut owner: Owner) -> Result<Owner, RepositoryError> {
        match owner.id.clone() {
            None => {
                let document = OwnerDocument::from_domain(&owner)?;
                let result = self
                    .collection
                    .insert_one(&document)
                    .await
                    .map_err(|e| conflict_on_duplicate(e, DUPLICATE_OWNER))?;
                let oid = result.inserted_id.as_object_id().ok_or_else(|| {
                    RepositoryError::DataCorruption("store assigned a non-ObjectId key".to_owned())
                })?;
                owner.id = Some(OwnerId::new(oid.to_hex()));
                Ok(owner)
            }
            Some(id) => {
                let oid = parse_object_id(id.as_str())?;
                let document = OwnerDocument::from_domain(&owner)?;
                self.collection
                    .replace_one(doc! { "_id": oid }, &document)
                    .await
                    .map_err(|e| conflict_on_duplicate(e, DUPLICATE_OWNER))?;
                Ok(owner)
            }
        }
    }

    async fn find_by_id(&self, id: &OwnerId) -> Result<Option<Owner>, RepositoryError> {
        let oid = parse_object_id(id.as_str())?;
        let document = self.collection.find_one(doc! { "_id": oid }).await?;
        document.map(OwnerDocument::into_domain).transpose()
    }

    async fn find_all(
        &self,
    ) -> Result<BoxStream<'static, Result<Owner, RepositoryError>>, RepositoryError> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor
            .map(|result| {
                result
                    .map_err(RepositoryError::from)
                    .and_then(OwnerDocument::into_domain)
            })
            .boxed())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Owner>, RepositoryError> {
        let document = self.collection.find_one(doc! { "email": email }).await?;
        document.map(OwnerDocument::into_domain).transpose()
    }

    async fn find_by_last_name(&self, last_name: &str) -> Result<Vec<Owner>, RepositoryError> {
        self.find_matching(doc! { "lastName": last_name }).await
    }

    async fn find_by_owned_card(&self, card_id: &CardId) -> Result<Vec<Owner>, RepositoryError> {
        self.find_matching(doc! { "ownedCardIds": card_id.as_str() })
            .await
    }

    async fn delete_by_id(&self, id: &OwnerId) -> Result<bool, RepositoryError> {
        let oid = parse_object_id(id.as_str())?;
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.collection.estimated_document_count().await?)
    }
}
