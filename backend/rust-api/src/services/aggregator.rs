//! Statistics derived from the answer-event ledger.
//!
//! The aggregator owns no state: every query is a fresh fold over the
//! matching events joined with the bank's per-topic sizes, so two reads
//! without intervening writes always agree.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{
    level_for_points, round_accuracy, AnswerEvent, EventFilter, ProgressStats, TopicStats,
};
use crate::services::ledger::ProgressLedger;
use crate::services::question_store::QuestionStore;

pub struct Aggregator {
    ledger: Arc<dyn ProgressLedger>,
    questions: Arc<dyn QuestionStore>,
}

impl Aggregator {
    pub fn new(ledger: Arc<dyn ProgressLedger>, questions: Arc<dyn QuestionStore>) -> Self {
        Self { ledger, questions }
    }

    /// Progress for one user/session, or across all writers when
    /// `user_id` is `None`.
    pub async fn progress(&self, user_id: Option<&str>) -> Result<ProgressStats, ApiError> {
        let filter = EventFilter {
            user_id: user_id.map(str::to_string),
            ..EventFilter::default()
        };

        let events = self.ledger.find(&filter).await?;
        let topic_totals = self.questions.topic_counts().await?;
        Ok(summarize(&events, &topic_totals))
    }
}

/// Pure fold over an event sequence. Events are expected in timestamp
/// order (the ledger's `find` contract), which only matters for the
/// trailing streak.
pub fn summarize(events: &[AnswerEvent], topic_totals: &HashMap<String, u64>) -> ProgressStats {
    if events.is_empty() {
        return ProgressStats::empty();
    }

    let total_answered = events.len() as u64;
    let correct_answered = events.iter().filter(|e| e.is_correct).count() as u64;
    let overall_accuracy =
        round_accuracy(correct_answered as f64 / total_answered as f64 * 100.0);

    // BTreeMap keeps topic order stable across calls.
    let mut by_topic: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for event in events {
        let entry = by_topic.entry(&event.topic).or_insert((0, 0));
        entry.0 += 1;
        if event.is_correct {
            entry.1 += 1;
        }
    }

    let topic_stats = by_topic
        .into_iter()
        .map(|(topic, (answered, correct))| TopicStats {
            topic: topic.to_string(),
            answered,
            correct,
            accuracy: round_accuracy(correct as f64 / answered as f64 * 100.0),
            total_questions: topic_totals.get(topic).copied().unwrap_or(0),
        })
        .collect();

    let total_points: u64 = events.iter().map(|e| e.points_earned as u64).sum();

    let current_streak = events
        .iter()
        .rev()
        .take_while(|e| e.is_correct)
        .count() as u32;

    ProgressStats {
        total_answered,
        correct_answered,
        overall_accuracy,
        topic_stats,
        total_points,
        level: level_for_points(total_points),
        current_streak,
    }
}
