mod common;

use axum::body::to_bytes;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

async fn submit(
    app: axum::Router,
    uri: &str,
    session_id: Option<&str>,
    payload: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(sid) = session_id {
        builder = builder.header("x-session-id", sid);
    }

    let response = app
        .oneshot(
            builder
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_correct_answer_earns_base_points() {
    let app = common::create_test_app().await;

    let (status, json) = submit(
        app,
        "/api/answer",
        None,
        json!({
            "question_id": "001",
            "selected_answers": [2],
            "time_spent": 45
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["correct"], true);
    assert_eq!(json["points_earned"], 10);
    assert_eq!(json["correct_answers"], json!([2]));
    // Guests get a generated session id back
    assert!(!json["session_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_fast_hard_answer_earns_multiplied_points() {
    let app = common::create_test_app().await;

    let (status, json) = submit(
        app,
        "/api/answer",
        None,
        json!({
            "question_id": "004",
            "selected_answers": [1],
            "time_spent": 5
        }),
    )
    .await;

    // 10 * 1.2 (fast) * 1.5 (hard), truncated
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["points_earned"], 18);
}

#[tokio::test]
async fn test_incorrect_answer_earns_consolation_points() {
    let app = common::create_test_app().await;

    let (status, json) = submit(
        app,
        "/api/answer",
        None,
        json!({
            "question_id": "001",
            "selected_answers": [0],
            "time_spent": 20
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["correct"], false);
    assert_eq!(json["points_earned"], 2);
    assert_eq!(json["correct_answers"], json!([2]));
}

#[tokio::test]
async fn test_multiple_select_order_does_not_matter() {
    let app = common::create_test_app().await;

    let (status, json) = submit(
        app,
        "/api/answer",
        None,
        json!({
            "question_id": "003",
            "selected_answers": [2, 0, 1],
            "time_spent": 30
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["correct"], true);
}

#[tokio::test]
async fn test_partial_selection_is_not_correct() {
    let app = common::create_test_app().await;

    let (status, json) = submit(
        app,
        "/api/answer",
        None,
        json!({
            "question_id": "003",
            "selected_answers": [0, 1],
            "time_spent": 30
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["correct"], false);
    assert_eq!(json["points_earned"], 2);
}

#[tokio::test]
async fn test_unknown_question_is_404() {
    let app = common::create_test_app().await;

    let (status, json) = submit(
        app,
        "/api/answer",
        None,
        json!({
            "question_id": "no-such-question",
            "selected_answers": [0],
            "time_spent": 10
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_out_of_range_selection_is_rejected() {
    let app = common::create_test_app().await;

    let (status, json) = submit(
        app,
        "/api/answer",
        None,
        json!({
            "question_id": "001",
            "selected_answers": [7],
            "time_spent": 10
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("selected_answers"));
}

#[tokio::test]
async fn test_empty_question_id_is_rejected() {
    let app = common::create_test_app().await;

    let (status, _) = submit(
        app,
        "/api/answer",
        None,
        json!({
            "question_id": "",
            "selected_answers": [0],
            "time_spent": 10
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_explanation_follows_requested_language() {
    let app = common::create_test_app().await;

    let (status, json) = submit(
        app,
        "/api/answer?language=en",
        None,
        json!({
            "question_id": "002",
            "selected_answers": [0],
            "time_spent": 15
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["explanation"]
        .as_str()
        .unwrap()
        .contains("7.5 million"));
}

#[tokio::test]
async fn test_session_id_header_is_echoed_back() {
    let app = common::create_test_app().await;
    let session_id = format!("session-{}", Uuid::new_v4());

    let (status, json) = submit(
        app,
        "/api/answer",
        Some(&session_id),
        json!({
            "question_id": "001",
            "selected_answers": [2],
            "time_spent": 30
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["session_id"], session_id);
}
