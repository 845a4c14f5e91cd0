use axum::Router;
use std::sync::Arc;

use quizbank_api::{config::Config, create_router, services::seed, services::AppState};

/// Builds a full router backed by in-memory storage, seeded with the
/// sample question bank. No external services are needed.
pub async fn create_test_app() -> Router {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let config = Config::for_tests();
    let app_state = Arc::new(AppState::in_memory(config));

    seed::seed_if_empty(&app_state.questions)
        .await
        .expect("Failed to seed test question bank");

    create_router(app_state)
}
