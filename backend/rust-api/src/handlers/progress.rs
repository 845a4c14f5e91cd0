use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middlewares::identity::Identity;
use crate::models::ProgressStats;
use crate::services::AppState;

#[derive(Debug, Deserialize)]
pub struct ProgressParams {
    pub user_id: Option<String>,
}

/// Stats for one user/session, or across every writer when neither a
/// query filter nor an authenticated identity narrows the scope.
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<ProgressParams>,
) -> Result<Json<ProgressStats>, ApiError> {
    let user_id = params.user_id.or_else(|| {
        identity
            .is_authenticated()
            .then(|| identity.user_id.clone())
    });

    let stats = state.aggregator().progress(user_id.as_deref()).await?;
    Ok(Json(stats))
}
