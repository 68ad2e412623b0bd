mod helpers;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use helpers::{docs_fixture, test_shell};
use kindred::docs::{self, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn site() -> (Router, tempfile::TempDir) {
    let docs_dir = docs_fixture();
    let state = AppState {
        shell: test_shell(),
        docs_dir: docs_dir.path().to_path_buf(),
    };
    (docs::router(state), docs_dir)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn allow_listed_pages_render() {
    let (app, _docs) = site();

    let (status, body) = get(&app, "/architecture/overview").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Architecture Overview"));
    assert!(body.contains("Table of Contents"));
}

#[tokio::test]
async fn unknown_page_slug_is_404() {
    let (app, _docs) = site();

    let (status, body) = get(&app, "/architecture/secret-plans").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("The requested page does not exist."));

    let (status, _) = get(&app, "/conspiracies/overview").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, "/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_content_degrades_inline() {
    // Allow-listed page whose file the fixture never wrote.
    let (app, _docs) = site();

    let (status, body) = get(&app, "/ethics/guardrails").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("This content is unavailable right now."));
}

#[tokio::test]
async fn index_renders_without_content_file() {
    let (app, _docs) = site();
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Kindred"));
}

#[tokio::test]
async fn search_enforces_minimum_query_length() {
    let (app, _docs) = site();

    let (_, body) = get(&app, "/search?q=p").await;
    assert!(body.contains("No matching pages."));

    let (_, body) = get(&app, "/search?q=pixel").await;
    assert!(body.contains("/user-interaction/interfaces"));
}

#[tokio::test]
async fn theme_css_tracks_settings() {
    let (app, _docs) = site();

    let (_, css) = get(&app, "/theme.css").await;
    assert!(css.contains("--pixel-color: #3498db;"));

    send_json(&app, "PUT", "/api/settings", json!({"pixelColor": "#2ecc71"})).await;
    let (_, css) = get(&app, "/theme.css").await;
    assert!(css.contains("--pixel-color: #2ecc71;"));
}

#[tokio::test]
async fn memory_svg_has_the_right_content_type() {
    let (app, _docs) = site();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/memory.svg?width=400&height=300")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "image/svg+xml"
    );
}

#[tokio::test]
async fn conversation_flows_through_the_api() {
    let (app, _docs) = site();

    let (status, value) = send_json(
        &app,
        "POST",
        "/api/conversation",
        json!({"text": "I feel anxious"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["accepted"], json!(true));

    // Blank input is rejected without touching the history.
    let (_, value) = send_json(&app, "POST", "/api/conversation", json!({"text": "  "})).await;
    assert_eq!(value["accepted"], json!(false));

    // The turn task runs with instant timing; poll until it lands.
    let mut turns = Value::Null;
    for _ in 0..100 {
        let (_, value) = send_json(&app, "GET", "/api/conversation", json!(null)).await;
        if value["turns"].as_array().map(|t| t.len()) == Some(2) {
            turns = value["turns"].clone();
            break;
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    }

    let turns = turns.as_array().expect("assistant turn committed");
    assert_eq!(turns[0]["sender"], json!("user"));
    assert_eq!(turns[1]["sender"], json!("assistant"));
    assert!(turns[1]["text"].as_str().unwrap().contains("stress"));
}

#[tokio::test]
async fn ritual_session_flows_through_the_api() {
    let (app, _docs) = site();

    let (_, session) =
        send_json(&app, "POST", "/api/rituals/morning-reflection/start", json!(null)).await;
    assert_eq!(session["ritualId"], json!("morning-reflection"));
    assert_eq!(session["stepIndex"], json!(0));
    assert_eq!(session["prevEnabled"], json!(false));

    let (_, session) =
        send_json(&app, "POST", "/api/rituals/navigate", json!({"direction": 1})).await;
    assert_eq!(session["stepIndex"], json!(1));
    assert_eq!(session["prevEnabled"], json!(true));

    let (status, _) = send_json(&app, "POST", "/api/rituals/close", json!(null)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, session) = send_json(&app, "GET", "/api/rituals/session", json!(null)).await;
    assert_eq!(session, Value::Null);
}

#[tokio::test]
async fn unknown_ritual_start_returns_null_session() {
    let (app, _docs) = site();
    let (status, session) =
        send_json(&app, "POST", "/api/rituals/sunset-stroll/start", json!(null)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session, Value::Null);
}

#[tokio::test]
async fn settings_reset_through_the_api() {
    let (app, _docs) = site();

    send_json(&app, "PUT", "/api/settings", json!({"hapticIntensity": 9})).await;
    let (_, value) = send_json(&app, "GET", "/api/settings", json!(null)).await;
    assert_eq!(value["hapticIntensity"], json!(9));

    let (_, value) = send_json(&app, "POST", "/api/settings/reset", json!(null)).await;
    assert_eq!(value["hapticIntensity"], json!(5));
    assert_eq!(value["pixelColor"], json!("#3498db"));
}

#[tokio::test]
async fn pixel_activation_reaches_the_indicator() {
    let (app, _docs) = site();

    let (status, _) = send_json(&app, "POST", "/api/pixel/activate", json!(null)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Activation also invites the companion to initiate a turn, so the
    // pixel is either still listening or already moved on with it.
    let (_, value) = send_json(&app, "GET", "/api/pixel", json!(null)).await;
    assert!(value["state"].is_string());
}

#[tokio::test]
async fn section_switching_through_the_api() {
    let (app, _docs) = site();

    let (_, value) = send_json(&app, "POST", "/api/section/memory-section", json!(null)).await;
    assert_eq!(value["section"], json!("memory-section"));

    // Unknown fragments leave the section unchanged.
    let (_, value) = send_json(&app, "POST", "/api/section/attic", json!(null)).await;
    assert_eq!(value["section"], json!("memory-section"));
}
