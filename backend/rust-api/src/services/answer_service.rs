use std::sync::Arc;

use crate::error::ApiError;
use crate::metrics::ANSWERS_SUBMITTED_TOTAL;
use crate::models::{AnswerEvent, SubmitAnswerRequest, SubmitAnswerResponse};
use crate::services::grader;
use crate::services::ledger::ProgressLedger;
use crate::services::question_store::QuestionStore;
use crate::services::scoring;
use crate::services::streaks::StreakCounter;

/// Orchestrates one answer submission: grade, score, append to the
/// ledger, update the streak cache.
pub struct AnswerService {
    questions: Arc<dyn QuestionStore>,
    ledger: Arc<dyn ProgressLedger>,
    streaks: Arc<dyn StreakCounter>,
}

impl AnswerService {
    pub fn new(
        questions: Arc<dyn QuestionStore>,
        ledger: Arc<dyn ProgressLedger>,
        streaks: Arc<dyn StreakCounter>,
    ) -> Self {
        Self {
            questions,
            ledger,
            streaks,
        }
    }

    pub async fn submit(
        &self,
        user_id: &str,
        language: &str,
        req: &SubmitAnswerRequest,
    ) -> Result<SubmitAnswerResponse, ApiError> {
        let question = self
            .questions
            .get(&req.question_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Question"))?;

        grader::validate_selection(&question, &req.selected_answers)?;
        let is_correct = grader::grade(&question, &req.selected_answers);

        let prior_streak = self.streaks.current(user_id).await.unwrap_or_else(|e| {
            tracing::warn!("streak lookup failed, assuming 0: {}", e);
            0
        });
        let points_earned =
            scoring::score(question.difficulty, is_correct, req.time_spent, prior_streak);

        // The append must be durable before we answer; a response without
        // a ledger entry would make the stats lie.
        let event = AnswerEvent::record(
            user_id,
            &question,
            req.selected_answers.clone(),
            is_correct,
            req.time_spent,
            points_earned,
        );
        let event_id = self.ledger.append(event).await?;

        // The streak counter is a cache over the ledger; losing an update
        // skews a future bonus input at worst, so it does not fail the
        // request after a durable append.
        if let Err(e) = self.streaks.record(user_id, is_correct).await {
            tracing::warn!("streak update failed after append: {}", e);
        }

        let correct_label = if is_correct { "true" } else { "false" };
        ANSWERS_SUBMITTED_TOTAL
            .with_label_values(&[correct_label])
            .inc();

        tracing::info!(
            user_id = %user_id,
            question_id = %req.question_id,
            event_id = %event_id,
            correct = is_correct,
            points = points_earned,
            "answer graded"
        );

        Ok(SubmitAnswerResponse {
            correct: is_correct,
            correct_answers: question.correct_answer.clone(),
            explanation: question.explanation.resolve(language).to_string(),
            points_earned,
            session_id: user_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventFilter;
    use crate::services::ledger::MemoryLedger;
    use crate::services::question_store::MemoryQuestionStore;
    use crate::services::seed::sample_questions;
    use crate::services::streaks::MemoryStreaks;

    async fn service_with_ledger() -> (AnswerService, Arc<MemoryLedger>) {
        let questions = Arc::new(MemoryQuestionStore::new());
        questions.insert_many(sample_questions()).await.unwrap();
        let ledger = Arc::new(MemoryLedger::new());
        let streaks = Arc::new(MemoryStreaks::new());
        (
            AnswerService::new(questions, ledger.clone(), streaks),
            ledger,
        )
    }

    fn request(question_id: &str, selected: Vec<usize>, time_spent: u32) -> SubmitAnswerRequest {
        SubmitAnswerRequest {
            question_id: question_id.to_string(),
            selected_answers: selected,
            time_spent,
        }
    }

    #[tokio::test]
    async fn correct_answer_earns_base_points_and_is_ledgered() {
        let (service, ledger) = service_with_ledger().await;
        let response = service
            .submit("alice", "de", &request("001", vec![2], 30))
            .await
            .unwrap();

        assert!(response.correct);
        assert_eq!(response.points_earned, 10);
        assert_eq!(response.correct_answers, vec![2]);

        let events = ledger.find(&EventFilter::for_user("alice")).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].topic, "Recht");
        assert_eq!(events[0].points_earned, 10);
    }

    #[tokio::test]
    async fn fast_hard_answer_stacks_bonuses() {
        let (service, _) = service_with_ledger().await;
        // question 004 is hard; 5 seconds is under the speed threshold
        let response = service
            .submit("alice", "de", &request("004", vec![1], 5))
            .await
            .unwrap();
        assert!(response.correct);
        assert_eq!(response.points_earned, 18);
    }

    #[tokio::test]
    async fn incorrect_answer_still_earns_participation_credit() {
        let (service, ledger) = service_with_ledger().await;
        let response = service
            .submit("alice", "de", &request("001", vec![0], 8))
            .await
            .unwrap();

        assert!(!response.correct);
        assert_eq!(response.points_earned, 2);
        // the miss is in the ledger too
        let events = ledger.find(&EventFilter::for_user("alice")).await.unwrap();
        assert!(!events[0].is_correct);
    }

    #[tokio::test]
    async fn unknown_question_is_not_found_and_nothing_is_appended() {
        let (service, ledger) = service_with_ledger().await;
        let err = service
            .submit("alice", "de", &request("999", vec![0], 5))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(ledger
            .find(&EventFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn out_of_range_selection_is_rejected_before_grading() {
        let (service, ledger) = service_with_ledger().await;
        let err = service
            .submit("alice", "de", &request("001", vec![7], 5))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
        assert!(ledger
            .find(&EventFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn explanation_is_localized_with_fallback() {
        let (service, _) = service_with_ledger().await;
        let english = service
            .submit("alice", "en", &request("002", vec![0], 30))
            .await
            .unwrap();
        assert!(english.explanation.contains("7.5 million"));

        // unknown language falls back to the default
        let fallback = service
            .submit("alice", "fr", &request("002", vec![0], 30))
            .await
            .unwrap();
        assert!(fallback.explanation.contains("7,5 Millionen"));
    }
}
