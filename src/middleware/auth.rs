use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;

/// Shared-secret middleware for protected routes. The `Authorization` header
/// must equal the configured token exactly; anything else stops the request
/// with 401 before a handler (or the store) is reached.
pub async fn shared_secret_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if !state.secret.verify(header) {
        tracing::warn!(
            "Rejected {} {}: {}",
            request.method(),
            request.uri().path(),
            if header.is_some() { "invalid token" } else { "missing Authorization header" }
        );
        return Err(ApiError::unauthorized("Invalid or missing shared-secret token"));
    }

    Ok(next.run(request).await)
}
