use serde::Deserialize;
use std::env;

/// Which ledger/question-store implementation the process runs with.
/// Chosen once at startup; never branched per-request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_database: String,
    pub redis_uri: String,
    pub storage_backend: StorageBackend,
    /// HS256 secret shared with the external identity provider. Token
    /// validation failures degrade to guest identity, so a bad secret
    /// never locks clients out of the quiz routes.
    pub identity_secret: String,
    pub default_language: String,
    pub bind_addr: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let config_builder = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings = config_builder.build()?;

        let mongo_uri = settings
            .get_string("database.mongo_uri")
            .or_else(|_| env::var("MONGO_URI"))
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let mongo_database = settings
            .get_string("database.mongo_database")
            .or_else(|_| env::var("MONGO_DATABASE"))
            .unwrap_or_else(|_| "quizbank".to_string());

        let redis_uri = settings
            .get_string("redis.uri")
            .or_else(|_| env::var("REDIS_URI"))
            .unwrap_or_else(|_| "redis://127.0.0.1:6379/0".to_string());

        let storage_backend = match settings
            .get_string("storage.backend")
            .or_else(|_| env::var("STORAGE_BACKEND"))
            .unwrap_or_else(|_| "mongo".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            _ => StorageBackend::Mongo,
        };

        let identity_secret = settings
            .get_string("auth.identity_secret")
            .or_else(|_| env::var("IDENTITY_SECRET"))
            .unwrap_or_else(|_| {
                if env == "prod" {
                    panic!("FATAL: IDENTITY_SECRET must be set in production!");
                }
                eprintln!("WARNING: Using default IDENTITY_SECRET (dev mode only!)");
                "dev-secret-only-for-local-testing".to_string()
            });

        let default_language = settings
            .get_string("localization.default_language")
            .or_else(|_| env::var("DEFAULT_LANGUAGE"))
            .unwrap_or_else(|_| "de".to_string());

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:8001".to_string());

        Ok(Config {
            mongo_uri,
            mongo_database,
            redis_uri,
            storage_backend,
            identity_secret,
            default_language,
            bind_addr,
        })
    }

    /// In-memory configuration used by the integration tests; no external
    /// services are contacted.
    pub fn for_tests() -> Self {
        Config {
            mongo_uri: "mongodb://localhost:27017".to_string(),
            mongo_database: "quizbank_test".to_string(),
            redis_uri: "redis://127.0.0.1:6379/0".to_string(),
            storage_backend: StorageBackend::Memory,
            identity_secret: "test-secret".to_string(),
            default_language: "de".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
        }
    }
}
