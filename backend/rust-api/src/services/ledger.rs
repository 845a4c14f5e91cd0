//! Append-only ledger of graded answers.
//!
//! One backend is picked at startup from configuration; nothing branches
//! per-request. The Mongo backend is the production one, the in-memory
//! backend backs tests and dependency-free local runs.

use std::sync::RwLock;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    Collection, Database,
};

use crate::error::ApiError;
use crate::models::{AnswerEvent, EventFilter};
use crate::utils::retry::{retry_async_with_config, RetryConfig};

#[async_trait]
pub trait ProgressLedger: Send + Sync {
    /// Durably appends one event. Returns only after the write is
    /// persisted; a failure here must surface to the caller so a graded
    /// answer is never silently dropped.
    async fn append(&self, event: AnswerEvent) -> Result<String, ApiError>;

    /// Events matching the filter, in timestamp order.
    async fn find(&self, filter: &EventFilter) -> Result<Vec<AnswerEvent>, ApiError>;

    /// Cheap liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), ApiError>;
}

pub struct MongoLedger {
    db: Database,
    collection: Collection<AnswerEvent>,
}

impl MongoLedger {
    pub const COLLECTION: &'static str = "answer_events";

    pub fn new(db: Database) -> Self {
        let collection = db.collection(Self::COLLECTION);
        Self { db, collection }
    }

    fn filter_document(filter: &EventFilter) -> Document {
        let mut document = doc! {};
        if let Some(user_id) = &filter.user_id {
            document.insert("user_id", user_id);
        }
        if let Some(topic) = &filter.topic {
            document.insert("topic", topic);
        }
        if let Some(is_correct) = filter.is_correct {
            document.insert("is_correct", is_correct);
        }
        document
    }
}

#[async_trait]
impl ProgressLedger for MongoLedger {
    async fn append(&self, event: AnswerEvent) -> Result<String, ApiError> {
        let event_id = event.id.clone();

        retry_async_with_config(RetryConfig::aggressive(), || async {
            self.collection.insert_one(&event).await.map(|_| ())
        })
        .await
        .map_err(ApiError::storage)?;

        tracing::debug!(event_id = %event_id, user_id = %event.user_id, "answer event appended");
        Ok(event_id)
    }

    async fn find(&self, filter: &EventFilter) -> Result<Vec<AnswerEvent>, ApiError> {
        let cursor = self
            .collection
            .find(Self::filter_document(filter))
            .sort(doc! { "timestamp": 1 })
            .await
            .map_err(ApiError::storage)?;

        cursor.try_collect().await.map_err(ApiError::storage)
    }

    async fn ping(&self) -> Result<(), ApiError> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(ApiError::storage)
    }
}

/// In-process ledger. Appends are atomic under the lock, so readers never
/// observe a partial event.
#[derive(Default)]
pub struct MemoryLedger {
    events: RwLock<Vec<AnswerEvent>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressLedger for MemoryLedger {
    async fn append(&self, event: AnswerEvent) -> Result<String, ApiError> {
        let event_id = event.id.clone();
        self.events
            .write()
            .map_err(|_| ApiError::storage(anyhow::anyhow!("ledger lock poisoned")))?
            .push(event);
        Ok(event_id)
    }

    async fn find(&self, filter: &EventFilter) -> Result<Vec<AnswerEvent>, ApiError> {
        let events = self
            .events
            .read()
            .map_err(|_| ApiError::storage(anyhow::anyhow!("ledger lock poisoned")))?;

        // Insertion order is timestamp order for a single process.
        Ok(events
            .iter()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Difficulty;
    use chrono::Utc;

    fn event(user: &str, topic: &str, correct: bool) -> AnswerEvent {
        AnswerEvent {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.to_string(),
            question_id: "q".to_string(),
            selected_answers: vec![0],
            is_correct: correct,
            time_spent: 12,
            topic: topic.to_string(),
            difficulty: Difficulty::Easy,
            points_earned: if correct { 10 } else { 2 },
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn appended_events_are_found_by_user_filter() {
        let ledger = MemoryLedger::new();
        let id = ledger.append(event("alice", "Recht", true)).await.unwrap();
        ledger.append(event("bob", "Recht", false)).await.unwrap();

        let found = ledger.find(&EventFilter::for_user("alice")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
    }

    #[tokio::test]
    async fn filter_fields_are_conjunctive() {
        let ledger = MemoryLedger::new();
        ledger.append(event("alice", "Recht", true)).await.unwrap();
        ledger.append(event("alice", "Recht", false)).await.unwrap();
        ledger.append(event("alice", "Technik", true)).await.unwrap();

        let filter = EventFilter {
            user_id: Some("alice".to_string()),
            topic: Some("Recht".to_string()),
            is_correct: Some(true),
        };
        assert_eq!(ledger.find(&filter).await.unwrap().len(), 1);
    }

    #[test]
    fn mongo_filter_document_skips_absent_fields() {
        let document = MongoLedger::filter_document(&EventFilter::default());
        assert!(document.is_empty());

        let document = MongoLedger::filter_document(&EventFilter {
            user_id: Some("u".to_string()),
            topic: None,
            is_correct: Some(false),
        });
        assert_eq!(document.get_str("user_id").unwrap(), "u");
        assert!(!document.get_bool("is_correct").unwrap());
        assert!(document.get("topic").is_none());
    }
}
