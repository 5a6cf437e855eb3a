// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse};

use crate::database::StoreError;

/// Fixed message for duplicate-key failures; store details are never exposed
pub const QUEST_EXISTS: &str = "Quest already exists!";

/// HTTP API error. Every handler failure goes through this one mapping to a
/// status code and a plain-text body.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 400 as well: the duplicate-key case has always answered 400
    Conflict(String),

    // 401 Unauthorized, empty body
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(id) => {
                tracing::info!("Rejected duplicate quest id {}", id);
                ApiError::conflict(QUEST_EXISTS)
            }
            StoreError::InvalidId(_) => ApiError::bad_request("Quest _id must be a non-empty string"),
            StoreError::NotAnObject => ApiError::bad_request("Quest must be a JSON object"),
            StoreError::InvalidFieldName(key) => {
                ApiError::bad_request(format!("Invalid field name {:?}: names cannot begin with '$' or contain '.'", key))
            }
            StoreError::Malformed(msg) => {
                tracing::warn!("Malformed quest document: {}", msg);
                ApiError::bad_request("Malformed quest document")
            }
            StoreError::Filter(e) => ApiError::bad_request(format!("Invalid query: {}", e)),
            other => {
                // Log the real error but return generic message
                tracing::error!("Datastore error: {}", other);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        match self {
            ApiError::Unauthorized(_) => status.into_response(),
            other => (status, other.message().to_string()).into_response(),
        }
    }
}
