//! Owner route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use futures::TryStreamExt;
use serde::Deserialize;
use tracing::instrument;

use cardfolio_core::{CardId, OwnerId};

use crate::error::Result;
use crate::models::{Owner, OwnerDraft};
use crate::state::AppState;

/// Query parameters for the email lookup.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// Create an owner.
#[instrument(skip(state, draft), fields(email = %draft.email))]
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<OwnerDraft>,
) -> Result<(StatusCode, Json<Owner>)> {
    let owner = state.owners().create(draft).await?;
    Ok((StatusCode::CREATED, Json(owner)))
}

/// List all owners.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Owner>>> {
    let owners = state.owners().list().await?.try_collect().await?;
    Ok(Json(owners))
}

/// Get an owner by id.
pub async fn show(State(state): State<AppState>, Path(id): Path<OwnerId>) -> Result<Json<Owner>> {
    Ok(Json(state.owners().get(&id).await?))
}

/// Replace an owner's content.
#[instrument(skip(state, draft), fields(owner_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<OwnerId>,
    Json(draft): Json<OwnerDraft>,
) -> Result<Json<Owner>> {
    Ok(Json(state.owners().update(&id, draft).await?))
}

/// Delete an owner.
#[instrument(skip(state), fields(owner_id = %id))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<OwnerId>) -> Result<StatusCode> {
    state.owners().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The owner with an exact-matching email.
pub async fn by_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Owner>> {
    Ok(Json(state.owners().get_by_email(&query.email).await?))
}

/// Owners with an exact-matching last name.
pub async fn by_last_name(
    State(state): State<AppState>,
    Path(last_name): Path<String>,
) -> Result<Json<Vec<Owner>>> {
    Ok(Json(state.owners().find_by_last_name(&last_name).await?))
}

/// Owners whose collection contains the given card.
pub async fn by_owned_card(
    State(state): State<AppState>,
    Path(card_id): Path<CardId>,
) -> Result<Json<Vec<Owner>>> {
    Ok(Json(state.owners().find_by_owned_card(&card_id).await?))
}

/// Approximate number of owners.
pub async fn count(State(state): State<AppState>) -> Result<Json<u64>> {
    Ok(Json(state.owners().count().await?))
}

/// Add a card to an owner's collection.
#[instrument(skip(state), fields(owner_id = %owner_id, card_id = %card_id))]
pub async fn add_card(
    State(state): State<AppState>,
    Path((owner_id, card_id)): Path<(OwnerId, CardId)>,
) -> Result<Json<Owner>> {
    Ok(Json(state.owners().add_card(&owner_id, card_id).await?))
}

/// Remove a card from an owner's collection.
#[instrument(skip(state), fields(owner_id = %owner_id, card_id = %card_id))]
pub async fn remove_card(
    State(state): State<AppState>,
    Path((owner_id, card_id)): Path<(OwnerId, CardId)>,
) -> Result<Json<Owner>> {
    Ok(Json(state.owners().remove_card(&owner_id, &card_id).await?))
}
