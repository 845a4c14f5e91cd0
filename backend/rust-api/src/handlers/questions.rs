use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::metrics::QUESTIONS_SERVED_TOTAL;
use crate::models::{Difficulty, QuestionView};
use crate::services::question_store::QuestionFilter;
use crate::services::AppState;

#[derive(Debug, Deserialize)]
pub struct QuestionListParams {
    pub topic: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub language: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionParams {
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TopicCount {
    pub topic: String,
    pub total_questions: u64,
}

fn language<'a>(requested: &'a Option<String>, state: &'a AppState) -> &'a str {
    requested
        .as_deref()
        .unwrap_or(&state.config.default_language)
}

pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuestionListParams>,
) -> Result<Json<Vec<QuestionView>>, ApiError> {
    let filter = QuestionFilter {
        topic: params.topic.clone(),
        difficulty: params.difficulty,
    };
    let questions = state.questions.find(&filter, params.limit).await?;

    QUESTIONS_SERVED_TOTAL.with_label_values(&["list"]).inc();

    let lang = language(&params.language, &state);
    Ok(Json(questions.iter().map(|q| q.localize(lang)).collect()))
}

pub async fn get_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<QuestionParams>,
) -> Result<Json<QuestionView>, ApiError> {
    let question = state
        .questions
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Question"))?;

    QUESTIONS_SERVED_TOTAL.with_label_values(&["get"]).inc();

    Ok(Json(question.localize(language(&params.language, &state))))
}

pub async fn random_question(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuestionListParams>,
) -> Result<Json<QuestionView>, ApiError> {
    let filter = QuestionFilter {
        topic: params.topic.clone(),
        difficulty: params.difficulty,
    };
    let question = state
        .questions
        .sample(&filter)
        .await?
        .ok_or_else(|| ApiError::not_found("Question matching the filter"))?;

    QUESTIONS_SERVED_TOTAL.with_label_values(&["random"]).inc();

    Ok(Json(question.localize(language(&params.language, &state))))
}

pub async fn list_topics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TopicCount>>, ApiError> {
    let counts = state.questions.topic_counts().await?;

    let mut topics: Vec<TopicCount> = counts
        .into_iter()
        .map(|(topic, total_questions)| TopicCount {
            topic,
            total_questions,
        })
        .collect();
    topics.sort_by(|a, b| a.topic.cmp(&b.topic));

    Ok(Json(topics))
}
