//! Read access to the immutable question bank.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, from_document, Document},
    Collection, Database,
};
use rand::seq::IndexedRandom;

use crate::error::ApiError;
use crate::models::{Difficulty, Question};

/// Narrowing for list and sampling queries. Topics compare as exact
/// strings, no fuzzy matching.
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub topic: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl QuestionFilter {
    pub fn matches(&self, question: &Question) -> bool {
        self.topic
            .as_ref()
            .is_none_or(|topic| topic == &question.topic)
            && self
                .difficulty
                .is_none_or(|difficulty| difficulty == question.difficulty)
    }
}

#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Question>, ApiError>;

    async fn find(
        &self,
        filter: &QuestionFilter,
        limit: Option<usize>,
    ) -> Result<Vec<Question>, ApiError>;

    /// One question drawn uniformly at random from the filtered set.
    /// `None` when nothing matches; every call draws fresh.
    async fn sample(&self, filter: &QuestionFilter) -> Result<Option<Question>, ApiError>;

    /// Bank size per topic, for joining into progress stats.
    async fn topic_counts(&self) -> Result<HashMap<String, u64>, ApiError>;

    async fn insert_many(&self, questions: Vec<Question>) -> Result<(), ApiError>;

    async fn is_empty(&self) -> Result<bool, ApiError>;
}

pub struct MongoQuestionStore {
    collection: Collection<Question>,
}

impl MongoQuestionStore {
    pub const COLLECTION: &'static str = "questions";

    pub fn new(db: Database) -> Self {
        Self {
            collection: db.collection(Self::COLLECTION),
        }
    }

    fn filter_document(filter: &QuestionFilter) -> Document {
        let mut document = doc! {};
        if let Some(topic) = &filter.topic {
            document.insert("topic", topic);
        }
        if let Some(difficulty) = filter.difficulty {
            document.insert("difficulty", difficulty.as_str());
        }
        document
    }
}

#[async_trait]
impl QuestionStore for MongoQuestionStore {
    async fn get(&self, id: &str) -> Result<Option<Question>, ApiError> {
        self.collection
            .find_one(doc! { "id": id })
            .await
            .map_err(ApiError::storage)
    }

    async fn find(
        &self,
        filter: &QuestionFilter,
        limit: Option<usize>,
    ) -> Result<Vec<Question>, ApiError> {
        let mut find = self.collection.find(Self::filter_document(filter));
        if let Some(limit) = limit {
            find = find.limit(limit as i64);
        }

        let cursor = find.await.map_err(ApiError::storage)?;
        cursor.try_collect().await.map_err(ApiError::storage)
    }

    async fn sample(&self, filter: &QuestionFilter) -> Result<Option<Question>, ApiError> {
        // $sample draws uniformly server-side; no result is cached across
        // calls.
        let pipeline = vec![
            doc! { "$match": Self::filter_document(filter) },
            doc! { "$sample": { "size": 1 } },
            doc! { "$project": { "_id": 0 } },
        ];

        let mut cursor = self
            .collection
            .aggregate(pipeline)
            .await
            .map_err(ApiError::storage)?;

        match cursor.try_next().await.map_err(ApiError::storage)? {
            Some(document) => from_document(document)
                .map(Some)
                .map_err(|e| ApiError::storage(anyhow::anyhow!("malformed question: {}", e))),
            None => Ok(None),
        }
    }

    async fn topic_counts(&self) -> Result<HashMap<String, u64>, ApiError> {
        let pipeline = vec![doc! {
            "$group": { "_id": "$topic", "total": { "$sum": 1 } }
        }];

        let mut cursor = self
            .collection
            .aggregate(pipeline)
            .await
            .map_err(ApiError::storage)?;

        let mut counts = HashMap::new();
        while let Some(document) = cursor.try_next().await.map_err(ApiError::storage)? {
            let topic = document.get_str("_id").unwrap_or_default().to_string();
            let total = document
                .get_i32("total")
                .map(|v| v as u64)
                .or_else(|_| document.get_i64("total").map(|v| v as u64))
                .unwrap_or(0);
            counts.insert(topic, total);
        }
        Ok(counts)
    }

    async fn insert_many(&self, questions: Vec<Question>) -> Result<(), ApiError> {
        if questions.is_empty() {
            return Ok(());
        }
        self.collection
            .insert_many(questions)
            .await
            .map(|_| ())
            .map_err(ApiError::storage)
    }

    async fn is_empty(&self) -> Result<bool, ApiError> {
        let count = self
            .collection
            .count_documents(doc! {})
            .await
            .map_err(ApiError::storage)?;
        Ok(count == 0)
    }
}

#[derive(Default)]
pub struct MemoryQuestionStore {
    questions: RwLock<Vec<Question>>,
}

impl MemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Question>>, ApiError> {
        self.questions
            .read()
            .map_err(|_| ApiError::storage(anyhow::anyhow!("question store lock poisoned")))
    }
}

#[async_trait]
impl QuestionStore for MemoryQuestionStore {
    async fn get(&self, id: &str) -> Result<Option<Question>, ApiError> {
        Ok(self.read()?.iter().find(|q| q.id == id).cloned())
    }

    async fn find(
        &self,
        filter: &QuestionFilter,
        limit: Option<usize>,
    ) -> Result<Vec<Question>, ApiError> {
        let questions = self.read()?;
        let matching = questions.iter().filter(|q| filter.matches(q)).cloned();
        Ok(match limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    async fn sample(&self, filter: &QuestionFilter) -> Result<Option<Question>, ApiError> {
        let questions = self.read()?;
        let matching: Vec<&Question> = questions.iter().filter(|q| filter.matches(q)).collect();
        Ok(matching.choose(&mut rand::rng()).map(|&q| q.clone()))
    }

    async fn topic_counts(&self) -> Result<HashMap<String, u64>, ApiError> {
        let mut counts = HashMap::new();
        for question in self.read()?.iter() {
            *counts.entry(question.topic.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn insert_many(&self, questions: Vec<Question>) -> Result<(), ApiError> {
        self.questions
            .write()
            .map_err(|_| ApiError::storage(anyhow::anyhow!("question store lock poisoned")))?
            .extend(questions);
        Ok(())
    }

    async fn is_empty(&self) -> Result<bool, ApiError> {
        Ok(self.read()?.is_empty())
    }
}
