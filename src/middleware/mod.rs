pub mod auth;
pub mod response;

pub use auth::shared_secret_middleware;
pub use response::{ApiResponse, ApiResult};
