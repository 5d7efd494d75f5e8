//! Card route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use futures::TryStreamExt;
use serde::Deserialize;
use tracing::instrument;

use cardfolio_core::CardId;

use crate::error::Result;
use crate::models::{Card, CardDraft};
use crate::state::AppState;

/// Query parameters for the name search.
#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

/// Create a card.
#[instrument(skip(state, draft), fields(name = %draft.name, set = %draft.set))]
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<CardDraft>,
) -> Result<(StatusCode, Json<Card>)> {
    let card = state.cards().create(draft).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// List all cards.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Card>>> {
    let cards = state.cards().list().await?.try_collect().await?;
    Ok(Json(cards))
}

/// Get a card by id.
pub async fn show(State(state): State<AppState>, Path(id): Path<CardId>) -> Result<Json<Card>> {
    Ok(Json(state.cards().get(&id).await?))
}

/// Replace a card's content.
#[instrument(skip(state, draft), fields(card_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<CardId>,
    Json(draft): Json<CardDraft>,
) -> Result<Json<Card>> {
    Ok(Json(state.cards().update(&id, draft).await?))
}

/// Delete a card.
#[instrument(skip(state), fields(card_id = %id))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<CardId>) -> Result<StatusCode> {
    state.cards().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Cards with an exact-matching type.
pub async fn by_type(
    State(state): State<AppState>,
    Path(card_type): Path<String>,
) -> Result<Json<Vec<Card>>> {
    Ok(Json(state.cards().find_by_type(&card_type).await?))
}

/// Cards with an exact-matching rarity.
pub async fn by_rarity(
    State(state): State<AppState>,
    Path(rarity): Path<String>,
) -> Result<Json<Vec<Card>>> {
    Ok(Json(state.cards().find_by_rarity(&rarity).await?))
}

/// Cards from an exact-matching set.
pub async fn by_set(
    State(state): State<AppState>,
    Path(set): Path<String>,
) -> Result<Json<Vec<Card>>> {
    Ok(Json(state.cards().find_by_set(&set).await?))
}

/// Case-insensitive substring search on card names.
pub async fn by_name(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Vec<Card>>> {
    Ok(Json(state.cards().search_by_name(&query.name).await?))
}

/// Approximate number of cards.
pub async fn count(State(state): State<AppState>) -> Result<Json<u64>> {
    Ok(Json(state.cards().count().await?))
}
