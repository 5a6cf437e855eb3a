// handlers/protected/mod.rs - Handlers behind the shared-secret middleware
//
// Every route here is wrapped by `middleware::shared_secret_middleware`;
// requests without the exact token never reach these functions.

pub mod quests; // Quest CRUD and objective completion

pub use quests::*;
