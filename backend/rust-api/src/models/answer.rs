use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::question::{Difficulty, Question};

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1, max = 64))]
    pub question_id: String,
    #[validate(length(max = 32))]
    pub selected_answers: Vec<usize>,
    /// Seconds the client reports the user spent on the question.
    #[validate(range(max = 86_400))]
    pub time_spent: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    pub correct: bool,
    pub correct_answers: Vec<usize>,
    pub explanation: String,
    pub points_earned: u32,
    /// Identity the attempt was recorded under. Guests get a generated
    /// session id here and can pass it back to track their progress.
    pub session_id: String,
}

/// One graded answer, written to the ledger exactly once and never
/// changed afterwards. Topic and difficulty are copied from the question
/// at submission time so aggregation survives later bank edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerEvent {
    pub id: String,
    pub user_id: String,
    pub question_id: String,
    pub selected_answers: Vec<usize>,
    pub is_correct: bool,
    pub time_spent: u32,
    pub topic: String,
    pub difficulty: Difficulty,
    pub points_earned: u32,
    pub timestamp: DateTime<Utc>,
}

impl AnswerEvent {
    pub fn record(
        user_id: &str,
        question: &Question,
        selected_answers: Vec<usize>,
        is_correct: bool,
        time_spent: u32,
        points_earned: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            question_id: question.id.clone(),
            selected_answers,
            is_correct,
            time_spent,
            topic: question.topic.clone(),
            difficulty: question.difficulty,
            points_earned,
            timestamp: Utc::now(),
        }
    }
}

/// Filter for ledger queries. All fields are conjunctive; `None` matches
/// everything.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub user_id: Option<String>,
    pub topic: Option<String>,
    pub is_correct: Option<bool>,
}

impl EventFilter {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, event: &AnswerEvent) -> bool {
        self.user_id
            .as_ref()
            .is_none_or(|user| user == &event.user_id)
            && self.topic.as_ref().is_none_or(|topic| topic == &event.topic)
            && self
                .is_correct
                .is_none_or(|correct| correct == event.is_correct)
    }
}
