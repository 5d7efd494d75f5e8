//! Admin route handlers for index inspection.

use axum::{Json, extract::Path, extract::State};
use serde_json::{Value, json};

use crate::db::{CARDS_COLLECTION, OWNERS_COLLECTION, indexes::IndexReport};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Index report for a single catalog collection.
///
/// Collection names are validated before touching the store so an unknown
/// name is a client error, not a silently empty report.
pub async fn index_report(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<IndexReport>> {
    if collection != CARDS_COLLECTION && collection != OWNERS_COLLECTION {
        return Err(AppError::BadRequest(format!(
            "unknown collection: {collection}"
        )));
    }
    Ok(Json(state.inspector().report(&collection).await?))
}

/// Index reports for both catalog collections, keyed by collection name.
pub async fn all_index_reports(State(state): State<AppState>) -> Result<Json<Value>> {
    let cards = state.inspector().report(CARDS_COLLECTION).await?;
    let owners = state.inspector().report(OWNERS_COLLECTION).await?;
    Ok(Json(json!({
        CARDS_COLLECTION: cards,
        OWNERS_COLLECTION: owners,
    })))
}
