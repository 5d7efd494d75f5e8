//! Development data seeding.
//!
//! Inserts a small fixture set of cards and owners through the service
//! layer, so the usual timestamp and uniqueness semantics apply. Re-running
//! against a seeded database is harmless: the unique indexes reject the
//! duplicates and the conflicts are logged as already-present.

use tracing::{info, warn};

use cardfolio_core::{Email, EmailError, Price};

use crate::db::RepositoryError;
use crate::models::{Address, CardDraft, OwnerDraft};
use crate::state::AppState;

/// Seed the catalog with fixture cards and owners.
pub async fn run(state: &AppState) {
    info!("seeding fixture data");

    for draft in fixture_cards() {
        let name = draft.name.clone();
        match state.cards().create(draft).await {
            Ok(card) => info!(name = %name, id = ?card.id, "seeded card"),
            Err(RepositoryError::Conflict(_)) => {
                info!(name = %name, "card already present, skipping");
            }
            Err(err) => warn!(name = %name, error = %err, "failed to seed card"),
        }
    }

    let owners = match fixture_owners() {
        Ok(owners) => owners,
        Err(err) => {
            warn!(error = %err, "invalid fixture email, skipping owner seed");
            return;
        }
    };
    for draft in owners {
        let email = draft.email.clone();
        match state.owners().create(draft).await {
            Ok(owner) => info!(email = %email, id = ?owner.id, "seeded owner"),
            Err(RepositoryError::Conflict(_)) => {
                info!(email = %email, "owner already present, skipping");
            }
            Err(err) => warn!(email = %email, error = %err, "failed to seed owner"),
        }
    }
}

fn card(
    name: &str,
    card_type: &str,
    hp: i32,
    rarity: &str,
    price_cents: u32,
    abilities: &[&str],
) -> CardDraft {
    CardDraft {
        name: name.to_owned(),
        card_type: card_type.to_owned(),
        hp,
        rarity: rarity.to_owned(),
        set: "Base Set".to_owned(),
        market_price: Price::from_cents(price_cents),
        abilities: abilities.iter().map(|a| (*a).to_owned()).collect(),
    }
}

fn fixture_cards() -> Vec<CardDraft> {
    vec![
        card("Pikachu", "Electric", 60, "Common", 2_500, &[
            "Static",
            "Thunder Shock",
        ]),
        card("Charizard", "Fire", 120, "Rare Holo", 35_000, &[
            "Blaze",
            "Fire Blast",
        ]),
        card("Blastoise", "Water", 100, "Rare Holo", 15_000, &[
            "Torrent",
            "Hydro Pump",
        ]),
        card("Venusaur", "Grass", 100, "Rare Holo", 12_000, &[
            "Overgrow",
            "Solar Beam",
        ]),
        card("Mewtwo", "Psychic", 120, "Rare Holo", 20_000, &[
            "Pressure",
            "Psychic",
        ]),
    ]
}

fn owner(
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: &str,
    street: &str,
    city: &str,
    zip_code: &str,
) -> Result<OwnerDraft, EmailError> {
    Ok(OwnerDraft {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: Email::parse(email)?,
        phone_number: phone.to_owned(),
        address: Address {
            street: street.to_owned(),
            city: city.to_owned(),
            state: "Kanto".to_owned(),
            zip_code: zip_code.to_owned(),
            country: "Pokemon World".to_owned(),
        },
        owned_card_ids: Vec::new(),
    })
}

fn fixture_owners() -> Result<Vec<OwnerDraft>, EmailError> {
    Ok(vec![
        owner(
            "Ash",
            "Ketchum",
            "ash.ketchum@pokemon.com",
            "555-0123",
            "123 Pokemon St",
            "Pallet Town",
            "12345",
        )?,
        owner(
            "Gary",
            "Oak",
            "gary.oak@pokemon.com",
            "555-0456",
            "456 Research Blvd",
            "Pallet Town",
            "12346",
        )?,
        owner(
            "Misty",
            "Waterflower",
            "misty.waterflower@pokemon.com",
            "555-0789",
            "789 Gym Ave",
            "Cerulean City",
            "12347",
        )?,
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_cards_are_distinct() {
        let cards = fixture_cards();
        assert_eq!(cards.len(), 5);
        let mut pairs: Vec<_> = cards
            .iter()
            .map(|c| (c.name.clone(), c.set.clone()))
            .collect();
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), 5);
    }

    #[test]
    fn test_fixture_owners_have_distinct_emails() {
        let owners = fixture_owners().unwrap();
        assert_eq!(owners.len(), 3);
        let mut emails: Vec<_> = owners.iter().map(|o| o.email.to_string()).collect();
        emails.sort();
        emails.dedup();
        assert_eq!(emails.len(), 3);
    }
}
