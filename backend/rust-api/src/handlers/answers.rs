use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;
use crate::extractors::AppJson;
use crate::middlewares::identity::Identity;
use crate::models::{SubmitAnswerRequest, SubmitAnswerResponse};
use crate::services::AppState;

#[derive(Debug, Deserialize)]
pub struct AnswerParams {
    pub language: Option<String>,
}

pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<AnswerParams>,
    AppJson(payload): AppJson<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::validation("body", e.to_string()))?;

    let language = params
        .language
        .as_deref()
        .unwrap_or(&state.config.default_language);

    let response = state
        .answer_service()
        .submit(&identity.user_id, language, &payload)
        .await?;

    Ok(Json(response))
}
