use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Quest API",
        "version": version,
        "endpoints": {
            "login": "GET /authent?user=&mdp= (public)",
            "quests": "GET|POST /quests (token)",
            "quest": "GET|DELETE /quests/:id (token)",
            "objectives": "PUT /quests/:id/objectives?descr= (token)",
            "batch": "GET /batch (public, seeds fixtures)",
            "health": "GET /health (public)",
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.repository.count().await {
        Ok(quests) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "quests": quests
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now
                })),
            )
        }
    }
}

/// Fallback for any unmatched route
pub async fn not_found() -> ApiError {
    tracing::debug!("404");
    ApiError::not_found("Page not found!")
}
