use axum::{
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct AuthentQuery {
    pub user: Option<String>,
    pub mdp: Option<String>,
}

/// GET /authent?user=..&mdp=.. - Check the static credentials
///
/// Nothing is issued: on success the caller already knows everything needed
/// to build the token (`base64(user + mdp)`). 200 and 401 both have empty bodies.
pub async fn authent(
    State(state): State<AppState>,
    Query(query): Query<AuthentQuery>,
) -> Result<StatusCode, ApiError> {
    tracing::debug!("Login attempt for {:?}", query.user);

    if state.secret.check_credentials(query.user.as_deref(), query.mdp.as_deref()) {
        tracing::info!("Login accepted");
        Ok(StatusCode::OK)
    } else {
        tracing::warn!("Login rejected for {:?}", query.user);
        Err(ApiError::unauthorized("Invalid credentials"))
    }
}
