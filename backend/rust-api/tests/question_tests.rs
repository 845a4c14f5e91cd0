mod common;

use axum::body::to_bytes;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_list_questions_returns_seeded_bank() {
    let app = common::create_test_app().await;

    let (status, json) = get_json(app, "/api/questions").await;

    assert_eq!(status, StatusCode::OK);
    let questions = json.as_array().unwrap();
    assert_eq!(questions.len(), 6);

    // Default language is German
    let first = questions
        .iter()
        .find(|q| q["id"] == "001")
        .expect("question 001 in list");
    assert!(first["question"]
        .as_str()
        .unwrap()
        .contains("Unterlagen"));
    assert_eq!(first["type"], "single");
    assert_eq!(first["correct_answer"], serde_json::json!([2]));
}

#[tokio::test]
async fn test_list_questions_filters_by_topic() {
    let app = common::create_test_app().await;

    let (status, json) = get_json(app, "/api/questions?topic=Recht").await;

    assert_eq!(status, StatusCode::OK);
    let questions = json.as_array().unwrap();
    assert_eq!(questions.len(), 3);
    assert!(questions.iter().all(|q| q["topic"] == "Recht"));
}

#[tokio::test]
async fn test_list_questions_filters_by_difficulty() {
    let app = common::create_test_app().await;

    let (status, json) = get_json(app, "/api/questions?difficulty=hard").await;

    assert_eq!(status, StatusCode::OK);
    let questions = json.as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert!(questions.iter().all(|q| q["difficulty"] == "hard"));
}

#[tokio::test]
async fn test_list_questions_respects_limit() {
    let app = common::create_test_app().await;

    let (status, json) = get_json(app, "/api/questions?limit=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_question_localized_in_english() {
    let app = common::create_test_app().await;

    let (status, json) = get_json(app, "/api/questions/002?language=en").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], "002");
    assert!(json["question"]
        .as_str()
        .unwrap()
        .contains("minimum insurance amount"));
    assert_eq!(json["options"][0], "7.5 million euros");
}

#[tokio::test]
async fn test_unknown_language_falls_back_to_german() {
    let app = common::create_test_app().await;

    let (status, json) = get_json(app, "/api/questions/002?language=fr").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["options"][0], "7,5 Millionen Euro");
}

#[tokio::test]
async fn test_get_question_not_found() {
    let app = common::create_test_app().await;

    let (status, json) = get_json(app, "/api/questions/does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
    assert!(json["message"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_open_question_hides_correct_answer() {
    let app = common::create_test_app().await;

    let (status, json) = get_json(app, "/api/questions/009").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "open");
    assert!(json.get("correct_answer").is_none());
}

#[tokio::test]
async fn test_random_question_honors_filter() {
    let app = common::create_test_app().await;

    for _ in 0..5 {
        let (status, json) = get_json(
            app.clone(),
            "/api/random-question?topic=Recht&difficulty=medium",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["topic"], "Recht");
        assert_eq!(json["difficulty"], "medium");
    }
}

#[tokio::test]
async fn test_random_question_no_match_is_404() {
    let app = common::create_test_app().await;

    let (status, _) = get_json(app, "/api/random-question?topic=Nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_topics_are_sorted_with_counts() {
    let app = common::create_test_app().await;

    let (status, json) = get_json(app, "/api/topics").await;

    assert_eq!(status, StatusCode::OK);
    let topics = json.as_array().unwrap();
    assert_eq!(topics.len(), 4);

    let names: Vec<&str> = topics.iter().map(|t| t["topic"].as_str().unwrap()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);

    let recht = topics.iter().find(|t| t["topic"] == "Recht").unwrap();
    assert_eq!(recht["total_questions"], 3);
}
