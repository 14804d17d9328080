//! Wire-level contract exercised through the router: raw JSON bodies in,
//! serialized statuses and error bodies out.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use taskdeck_server::{AppState, router};
use tower::ServiceExt;

fn app() -> Router {
    router(AppState::shared())
}

async fn send(app: &Router, method: &str, path: &str, body: Option<&str>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn create_and_list_round_trip_on_the_wire() {
    let app = app();

    let (status, body) = send(&app, "POST", "/api/tasks", Some(r#"{"title":"Buy milk"}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "Buy milk");
    assert_eq!(body["completed"], false);
    assert!(body["createdAt"].is_string());

    let (status, body) = send(&app, "GET", "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unparseable_create_body_is_400_invalid_task_data() {
    let app = app();

    // Missing required field.
    let (status, body) = send(&app, "POST", "/api/tasks", Some(r#"{"titel":"x"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Invalid task data"}));

    // Not JSON at all.
    let (status, body) = send(&app, "POST", "/api/tasks", Some("not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid task data");

    let (_, body) = send(&app, "GET", "/api/tasks", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn invalid_title_is_400_with_field_errors() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/tasks", Some(r#"{"title":"   "}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "message": "Invalid task data",
            "errors": [{"field": "title", "message": "Task title is required"}],
        })
    );
}

#[tokio::test]
async fn unparseable_update_body_is_400_invalid_update_data() {
    let app = app();
    send(&app, "POST", "/api/tasks", Some(r#"{"title":"Buy milk"}"#)).await;

    let (status, body) = send(&app, "PATCH", "/api/tasks/1", Some(r#"{"completed":"yes"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Invalid update data"}));

    // The task is untouched.
    let (_, body) = send(&app, "GET", "/api/tasks", None).await;
    assert_eq!(body[0]["completed"], false);
}

#[tokio::test]
async fn id_segment_taxonomy_on_the_wire() {
    let app = app();

    let (status, body) = send(&app, "PATCH", "/api/tasks/abc", Some(r#"{"completed":true}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Invalid task ID"}));

    let (status, body) = send(&app, "PATCH", "/api/tasks/7", Some(r#"{"completed":true}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Task not found"}));

    let (status, body) = send(&app, "PATCH", "/api/tasks/-3", Some(r#"{"completed":true}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Task not found"}));
}

#[tokio::test]
async fn update_applies_partial_bodies() {
    let app = app();
    send(&app, "POST", "/api/tasks", Some(r#"{"title":"Buy milk"}"#)).await;

    let (status, body) = send(&app, "PATCH", "/api/tasks/1", Some(r#"{"completed":true}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Buy milk");
    assert_eq!(body["completed"], true);
}

#[tokio::test]
async fn delete_and_clear_status_codes() {
    let app = app();
    send(&app, "POST", "/api/tasks", Some(r#"{"title":"Buy milk"}"#)).await;

    let (status, body) = send(&app, "DELETE", "/api/tasks/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "DELETE", "/api/tasks/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Task not found"}));

    let (status, _) = send(&app, "POST", "/api/tasks/clear-completed", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
