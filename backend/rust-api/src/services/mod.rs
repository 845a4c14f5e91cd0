use std::sync::Arc;

use redis::aio::ConnectionManager;

use crate::config::{Config, StorageBackend};

pub mod aggregator;
pub mod answer_service;
pub mod grader;
pub mod ledger;
pub mod question_store;
pub mod scoring;
pub mod seed;
pub mod streaks;

use aggregator::Aggregator;
use answer_service::AnswerService;
use ledger::{MemoryLedger, MongoLedger, ProgressLedger};
use question_store::{MemoryQuestionStore, MongoQuestionStore, QuestionStore};
use streaks::{MemoryStreaks, RedisStreaks, StreakCounter};

/// Shared application state. The storage backend is chosen here, once,
/// at startup; request handlers only ever see the trait objects.
pub struct AppState {
    pub config: Config,
    pub questions: Arc<dyn QuestionStore>,
    pub ledger: Arc<dyn ProgressLedger>,
    pub streaks: Arc<dyn StreakCounter>,
}

impl AppState {
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        match config.storage_backend {
            StorageBackend::Mongo => Self::connect(config).await,
            StorageBackend::Memory => Ok(Self::in_memory(config)),
        }
    }

    /// MongoDB-backed state with a Redis streak cache.
    pub async fn connect(config: Config) -> anyhow::Result<Self> {
        let mongo_client = mongodb::Client::with_uri_str(&config.mongo_uri).await?;
        let db = mongo_client.database(&config.mongo_database);
        tracing::info!("MongoDB connected");

        let redis_client = redis::Client::open(config.redis_uri.clone())?;

        tracing::info!("Attempting to connect to Redis...");
        let redis = tokio::time::timeout(
            std::time::Duration::from_secs(30),
            ConnectionManager::new(redis_client),
        )
        .await
        .map_err(|_| anyhow::anyhow!("Redis connection timeout after 30s"))??;

        // Fail fast at startup if the cache is unreachable.
        let mut conn = redis.clone();
        tokio::time::timeout(
            std::time::Duration::from_secs(5),
            redis::cmd("PING").query_async::<String>(&mut conn),
        )
        .await
        .map_err(|_| anyhow::anyhow!("Redis PING timeout after 5s"))??;
        tracing::info!("Redis connection established");

        Ok(Self {
            config,
            questions: Arc::new(MongoQuestionStore::new(db.clone())),
            ledger: Arc::new(MongoLedger::new(db)),
            streaks: Arc::new(RedisStreaks::new(redis)),
        })
    }

    /// Entirely in-process state; used by tests and dependency-free runs.
    pub fn in_memory(config: Config) -> Self {
        Self {
            config,
            questions: Arc::new(MemoryQuestionStore::new()),
            ledger: Arc::new(MemoryLedger::new()),
            streaks: Arc::new(MemoryStreaks::new()),
        }
    }

    pub fn answer_service(&self) -> AnswerService {
        AnswerService::new(
            self.questions.clone(),
            self.ledger.clone(),
            self.streaks.clone(),
        )
    }

    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new(self.ledger.clone(), self.questions.clone())
    }
}
