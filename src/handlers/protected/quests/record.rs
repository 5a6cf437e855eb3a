use axum::extract::{Path, State};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::Document;

/// GET /quests/:id - Fetch one quest
///
/// A missing id answers 200 with an empty body rather than 404; clients
/// rely on testing for an empty response.
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Option<Document>> {
    tracing::debug!("Fetching quest {}", id);

    let quest = state.repository.get(&id).await?;
    Ok(ApiResponse::success(quest))
}

/// DELETE /quests/:id - Remove a quest; the body is the removed count as text
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<String, ApiError> {
    let removed = state.repository.delete(&id).await?;

    tracing::info!("Deleted {} quest(s) with id {}", removed, id);
    Ok(removed.to_string())
}
