//! Consecutive-correct-answer counters.
//!
//! The counter is a cache feeding the scoring engine's `prior_streak`
//! input, not a source of truth: the ledger remains the authoritative
//! record and the aggregator re-derives streaks from it.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use redis::aio::ConnectionManager;

use crate::error::ApiError;

/// Streaks older than this are considered abandoned.
const STREAK_TTL_SECS: u32 = 3600;

#[async_trait]
pub trait StreakCounter: Send + Sync {
    async fn current(&self, user_id: &str) -> Result<u32, ApiError>;

    /// Bumps the streak on a correct answer, resets it on an incorrect
    /// one. Returns the streak after the update.
    async fn record(&self, user_id: &str, correct: bool) -> Result<u32, ApiError>;
}

pub struct RedisStreaks {
    redis: ConnectionManager,
}

impl RedisStreaks {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    fn key(user_id: &str) -> String {
        format!("streak:{}", user_id)
    }
}

#[async_trait]
impl StreakCounter for RedisStreaks {
    async fn current(&self, user_id: &str) -> Result<u32, ApiError> {
        let mut conn = self.redis.clone();
        let value: Option<u32> = redis::cmd("GET")
            .arg(Self::key(user_id))
            .query_async(&mut conn)
            .await
            .map_err(ApiError::storage)?;
        Ok(value.unwrap_or(0))
    }

    async fn record(&self, user_id: &str, correct: bool) -> Result<u32, ApiError> {
        let mut conn = self.redis.clone();
        let key = Self::key(user_id);

        if !correct {
            redis::cmd("DEL")
                .arg(&key)
                .query_async::<()>(&mut conn)
                .await
                .map_err(ApiError::storage)?;
            return Ok(0);
        }

        let streak: u32 = redis::cmd("INCR")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(ApiError::storage)?;

        redis::cmd("EXPIRE")
            .arg(&key)
            .arg(STREAK_TTL_SECS)
            .query_async::<()>(&mut conn)
            .await
            .map_err(ApiError::storage)?;

        Ok(streak)
    }
}

#[derive(Default)]
pub struct MemoryStreaks {
    streaks: Mutex<HashMap<String, u32>>,
}

impl MemoryStreaks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, u32>>, ApiError> {
        self.streaks
            .lock()
            .map_err(|_| ApiError::storage(anyhow::anyhow!("streak lock poisoned")))
    }
}

#[async_trait]
impl StreakCounter for MemoryStreaks {
    async fn current(&self, user_id: &str) -> Result<u32, ApiError> {
        Ok(self.lock()?.get(user_id).copied().unwrap_or(0))
    }

    async fn record(&self, user_id: &str, correct: bool) -> Result<u32, ApiError> {
        let mut streaks = self.lock()?;
        if !correct {
            streaks.remove(user_id);
            return Ok(0);
        }
        let streak = streaks.entry(user_id.to_string()).or_insert(0);
        *streak += 1;
        Ok(*streak)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn streak_grows_and_resets() {
        let streaks = MemoryStreaks::new();
        assert_eq!(streaks.current("u").await.unwrap(), 0);
        assert_eq!(streaks.record("u", true).await.unwrap(), 1);
        assert_eq!(streaks.record("u", true).await.unwrap(), 2);
        assert_eq!(streaks.current("u").await.unwrap(), 2);
        assert_eq!(streaks.record("u", false).await.unwrap(), 0);
        assert_eq!(streaks.current("u").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn streaks_are_per_user() {
        let streaks = MemoryStreaks::new();
        streaks.record("a", true).await.unwrap();
        streaks.record("b", true).await.unwrap();
        streaks.record("b", true).await.unwrap();
        assert_eq!(streaks.current("a").await.unwrap(), 1);
        assert_eq!(streaks.current("b").await.unwrap(), 2);
    }
}
