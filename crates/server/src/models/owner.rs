//! Card owner model.

use cardfolio_core::{CardId, Email, OwnerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A card owner.
///
/// `email` is unique across the collection (unique index). `owned_card_ids`
/// holds weak references to cards: no existence guarantee against the card
/// collection and no cascade on card deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<OwnerId>,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone_number: String,
    pub address: Address,
    #[serde(default)]
    pub owned_card_ids: Vec<CardId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Postal address embedded in an owner document (no independent identity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Request payload for creating or updating an owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone_number: String,
    pub address: Address,
    #[serde(default)]
    pub owned_card_ids: Vec<CardId>,
}

impl Owner {
    /// Build a fresh owner from a draft, with both timestamps set to `now`
    /// and no identity (the store assigns one on insert).
    #[must_use]
    pub fn from_draft(draft: OwnerDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            phone_number: draft.phone_number,
            address: draft.address,
            owned_card_ids: draft.owned_card_ids,
            created_at: now,
            updated_at: now,
        }
    }
}
