use std::path::PathBuf;
use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::SharedSecret;
use crate::config::AppConfig;
use crate::database::{Datastore, QuestRepository, StoreError};
use crate::handlers;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub repository: QuestRepository,
    pub secret: Arc<SharedSecret>,
    pub seed_file: Arc<PathBuf>,
}

impl AppState {
    pub fn new(store: Arc<Datastore>, secret: SharedSecret, seed_file: impl Into<PathBuf>) -> Self {
        Self {
            repository: QuestRepository::new(store),
            secret: Arc::new(secret),
            seed_file: Arc::new(seed_file.into()),
        }
    }

    /// Open the configured data file and build state from config
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let store = Datastore::open(&config.store.data_file).await?;
        Ok(Self::new(
            Arc::new(store),
            SharedSecret::from_config(&config.auth),
            config.store.seed_file.clone(),
        ))
    }
}

pub fn app(state: AppState) -> Router {
    use handlers::public;

    Router::new()
        // Public
        .route("/", get(public::root).fallback(public::not_found))
        .route("/health", get(public::health).fallback(public::not_found))
        .route("/authent", get(public::authent).fallback(public::not_found))
        .route("/batch", get(public::batch).fallback(public::not_found))
        // Protected
        .merge(quest_routes(state.clone()))
        .fallback(public::not_found)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Token-guarded quest routes. A known path with an unknown method falls
/// through to the 404 handler before the token is checked.
fn quest_routes(state: AppState) -> Router<AppState> {
    use axum::routing::put;
    use handlers::protected::quests;
    use handlers::public::not_found;

    Router::new()
        .route("/quests", get(quests::quests_get).post(quests::quests_post).fallback(not_found))
        .route("/quests/:id", get(quests::quest_get).delete(quests::quest_delete).fallback(not_found))
        .route("/quests/:id/objectives", put(quests::objectives_put).fallback(not_found))
        // route_layer wraps only the method handlers above, not the fallbacks
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::shared_secret_middleware,
        ))
}
