use axum::extract::State;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::Document;

/// GET /batch - Insert every quest from the configured seed file
///
/// All-or-nothing: a duplicate id anywhere in the file inserts nothing and
/// answers 400. Intended as a one-off fixture loader.
pub async fn batch(State(state): State<AppState>) -> ApiResult<Vec<Document>> {
    tracing::info!("Seeding quests from {}", state.seed_file.display());

    let inserted = state.repository.seed_from_file(&state.seed_file).await?;

    tracing::info!("Seeded {} quests", inserted.len());
    Ok(ApiResponse::success(inserted))
}
