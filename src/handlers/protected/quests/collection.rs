use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde_json::{Map, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::Document;

/// Only the literal "true" selects completed quests; any other value,
/// including an empty one, selects open quests.
pub fn completed_filter(params: &HashMap<String, String>) -> Option<bool> {
    params.get("completed").map(|v| v == "true")
}

/// GET /quests[?completed=true|false] - List quests sorted by title
pub async fn get(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Document>> {
    let completed = completed_filter(&params);
    tracing::debug!("Listing quests (completed = {:?})", completed);

    let quests = state.repository.list(completed).await?;
    Ok(ApiResponse::success(quests))
}

/// POST /quests - Insert the body as-is; the store assigns `_id` when absent
///
/// A request without a JSON content type is stored as an empty quest, the
/// way a JSON body parser that skips non-JSON requests would leave it.
pub async fn post(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Document> {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(JsonRejection::MissingJsonContentType(_)) => Value::Object(Map::new()),
        Err(rejection) => {
            tracing::debug!("Rejected quest body: {}", rejection.body_text());
            return Err(ApiError::bad_request("Request body must be valid JSON"));
        }
    };

    let quest = state.repository.create(payload).await?;

    tracing::info!("Created quest {:?}", quest.get("_id"));
    Ok(ApiResponse::created(quest))
}
