use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Append-only document log holding the quest collection
    pub data_file: PathBuf,
    /// JSON array loaded by GET /batch and `quest-api seed`
    pub seed_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    /// Install the global tracing subscriber. RUST_LOG wins over the configured level.
    pub fn init(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));
        // A second init (e.g. from tests) is harmless
        let _ = fmt().with_env_filter(filter).try_init();
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(port) = env::var("QUEST_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Store overrides
        if let Ok(v) = env::var("QUEST_DATA_FILE") {
            self.store.data_file = PathBuf::from(v);
        }
        if let Ok(v) = env::var("QUEST_SEED_FILE") {
            self.store.seed_file = PathBuf::from(v);
        }

        // Auth overrides
        if let Ok(v) = env::var("QUEST_AUTH_USER") {
            self.auth.user = v;
        }
        if let Ok(v) = env::var("QUEST_AUTH_PASSWORD") {
            self.auth.password = v;
        }

        // Logging overrides
        if let Ok(v) = env::var("QUEST_LOG_LEVEL") {
            self.logging.level = v;
        }

        self
    }

    fn base(environment: Environment, level: &str) -> Self {
        Self {
            environment,
            server: ServerConfig { port: 8080 },
            store: StoreConfig {
                data_file: PathBuf::from("bdd/quests"),
                seed_file: PathBuf::from("batch/quests.json"),
            },
            auth: AuthConfig {
                user: "meliban".to_string(),
                password: "2chatons".to_string(),
            },
            logging: LoggingConfig { level: level.to_string() },
        }
    }

    fn development() -> Self {
        Self::base(Environment::Development, "debug")
    }

    fn staging() -> Self {
        Self::base(Environment::Staging, "info")
    }

    fn production() -> Self {
        Self::base(Environment::Production, "warn")
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
