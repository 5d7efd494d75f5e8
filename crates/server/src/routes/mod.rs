//! HTTP route handlers for the catalog API.
//!
//! # Route Structure
//!
//! ```text
//! # Cards
//! GET    /api/cards                        - List all cards
//! POST   /api/cards                        - Create a card
//! GET    /api/cards/count                  - Approximate card count
//! GET    /api/cards/search/type/{type}     - Cards by exact type
//! GET    /api/cards/search/rarity/{rarity} - Cards by exact rarity
//! GET    /api/cards/search/set/{set}       - Cards by exact set
//! GET    /api/cards/search/name?name=...   - Case-insensitive name search
//! GET    /api/cards/{id}                   - Card by id
//! PUT    /api/cards/{id}                   - Replace a card
//! DELETE /api/cards/{id}                   - Delete a card
//!
//! # Owners
//! GET    /api/owners                             - List all owners
//! POST   /api/owners                             - Create an owner
//! GET    /api/owners/count                       - Approximate owner count
//! GET    /api/owners/search/email?email=...      - Owner by exact email
//! GET    /api/owners/search/lastname/{lastName}  - Owners by exact last name
//! GET    /api/owners/search/card/{cardId}        - Owners holding a card
//! GET    /api/owners/{id}                        - Owner by id
//! PUT    /api/owners/{id}                        - Replace an owner
//! DELETE /api/owners/{id}                        - Delete an owner
//! POST   /api/owners/{ownerId}/cards/{cardId}    - Add a card to the collection
//! DELETE /api/owners/{ownerId}/cards/{cardId}    - Remove a card from the collection
//!
//! # Admin
//! GET    /api/admin/indexes               - Index reports for both collections
//! GET    /api/admin/indexes/{collection}  - Index report for one collection
//! ```

pub mod admin;
pub mod cards;
pub mod owners;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the card routes router.
pub fn card_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cards::list).post(cards::create))
        .route("/count", get(cards::count))
        .route("/search/type/{card_type}", get(cards::by_type))
        .route("/search/rarity/{rarity}", get(cards::by_rarity))
        .route("/search/set/{set}", get(cards::by_set))
        .route("/search/name", get(cards::by_name))
        .route(
            "/{id}",
            get(cards::show).put(cards::update).delete(cards::remove),
        )
}

/// Create the owner routes router.
pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(owners::list).post(owners::create))
        .route("/count", get(owners::count))
        .route("/search/email", get(owners::by_email))
        .route("/search/lastname/{last_name}", get(owners::by_last_name))
        .route("/search/card/{card_id}", get(owners::by_owned_card))
        .route(
            "/{id}",
            get(owners::show).put(owners::update).delete(owners::remove),
        )
        .route(
            "/{owner_id}/cards/{card_id}",
            post(owners::add_card).delete(owners::remove_card),
        )
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/indexes", get(admin::all_index_reports))
        .route("/indexes/{collection}", get(admin::index_report))
}

/// Create all API routes for the catalog service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/cards", card_routes())
        .nest("/api/owners", owner_routes())
        .nest("/api/admin", admin_routes())
}
