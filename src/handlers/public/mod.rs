// handlers/public/mod.rs - Endpoints reachable without the shared-secret token

pub mod auth;   // GET /authent - credential check
pub mod batch;  // GET /batch - seed fixture loader
pub mod system; // GET /, GET /health, fallback 404

pub use auth::authent;
pub use batch::batch;
pub use system::{health, not_found, root};
