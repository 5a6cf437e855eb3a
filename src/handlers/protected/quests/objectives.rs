use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::quest::{is_truthy, COMPLETED_FIELD};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::Document;

#[derive(Debug, Deserialize)]
pub struct ObjectiveQuery {
    pub descr: Option<String>,
}

/// PUT /quests/:id/objectives?descr=.. - Complete an objective
///
/// Marks every objective whose `descr` matches, completes the quest when no
/// objective is left open, and stores the result. 404 when the quest is gone.
pub async fn put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ObjectiveQuery>,
) -> ApiResult<Document> {
    let descr = query
        .descr
        .ok_or_else(|| ApiError::bad_request("Missing descr query parameter"))?;
    tracing::debug!("Completing objective {:?} on quest {}", descr, id);

    let quest = state
        .repository
        .complete_objective(&id, &descr)
        .await?
        .ok_or_else(|| ApiError::not_found("Quest not found"))?;

    tracing::info!(
        "Quest {} objective {:?} completed (quest completed = {})",
        id,
        descr,
        is_truthy(quest.get(COMPLETED_FIELD))
    );
    Ok(ApiResponse::created(quest))
}
