//! Trading card model.

use cardfolio_core::{CardId, Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A trading card.
///
/// `id` is the store-assigned opaque key: absent until the first insert,
/// immutable afterwards. The `(name, set)` pair is unique across the
/// collection, enforced by a unique index rather than application logic.
/// `created_at` is set once at creation; `updated_at` changes on every
/// mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CardId>,
    pub name: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub hp: i32,
    pub rarity: String,
    pub set: String,
    pub market_price: Price,
    pub abilities: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating or updating a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub hp: i32,
    pub rarity: String,
    pub set: String,
    pub market_price: Price,
    #[serde(default)]
    pub abilities: Vec<String>,
}

impl Card {
    /// Build a fresh card from a draft, with both timestamps set to `now`
    /// and no identity (the store assigns one on insert).
    #[must_use]
    pub fn from_draft(draft: CardDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name: draft.name,
            card_type: draft.card_type,
            hp: draft.hp,
            rarity: draft.rarity,
            set: draft.set,
            market_price: draft.market_price,
            abilities: draft.abilities,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pikachu_draft() -> CardDraft {
        serde_json::from_value(serde_json::json!({
            "name": "Pikachu",
            "type": "Electric",
            "hp": 60,
            "rarity": "Common",
            "set": "Base Set",
            "marketPrice": "25.00",
            "abilities": ["Static", "Thunder Shock"]
        }))
        .unwrap()
    }

    #[test]
    fn test_draft_wire_names() {
        let draft = pikachu_draft();
        assert_eq!(draft.card_type, "Electric");
        assert_eq!(draft.market_price, Price::from_cents(2500));
        assert_eq!(draft.abilities, vec!["Static", "Thunder Shock"]);
    }

    #[test]
    fn test_from_draft_stamps_both_timestamps() {
        let now = Utc::now();
        let card = Card::from_draft(pikachu_draft(), now);
        assert!(card.id.is_none());
        assert_eq!(card.created_at, now);
        assert_eq!(card.updated_at, now);
    }

    #[test]
    fn test_card_serializes_camel_case() {
        let now = Utc::now();
        let mut card = Card::from_draft(pikachu_draft(), now);
        card.id = Some(CardId::new("68a1f0c2e4b0a93d2c7f11aa"));

        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["id"], "68a1f0c2e4b0a93d2c7f11aa");
        assert_eq!(value["type"], "Electric");
        assert_eq!(value["marketPrice"], "25.00");
        assert!(value.get("card_type").is_none());
    }

    #[test]
    fn test_absent_id_is_omitted() {
        let card = Card::from_draft(pikachu_draft(), Utc::now());
        let value = serde_json::to_value(&card).unwrap();
        assert!(value.get("id").is_none());
    }
}
