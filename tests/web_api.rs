//! Request-level tests against the full router
//!
//! These tests verify that:
//! - The public page serves 503 with Retry-After during maintenance
//! - Preview mode renders the page without the outage status
//! - The settings and messages APIs validate and persist changes

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::fixtures::{TestConfigBuilder, TestEnv};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

#[tokio::test]
async fn test_page_is_up_outside_maintenance() {
    let env = TestEnv::new().await.unwrap();
    let app = env.router().unwrap();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("up and running"));
}

#[tokio::test]
async fn test_page_serves_503_during_maintenance() {
    let env = TestEnv::new().await.unwrap();
    env.save_window(true, "2020-01-01T00:00", "2099-01-01T00:00", "UTC")
        .await
        .unwrap();
    let app = env.router().unwrap();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let retry_after = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .expect("Retry-After header should be present");
    assert!(retry_after > 0);

    let cache_control = response
        .headers()
        .get(header::CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cache_control.contains("no-store"));

    assert!(body_string(response).await.contains("Site Under Maintenance"));
}

#[tokio::test]
async fn test_preview_renders_page_outside_window() {
    let env = TestEnv::new().await.unwrap();
    let app = env.router().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?preview=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Site Under Maintenance"));
    assert!(body.contains("Preview mode"));
}

#[tokio::test]
async fn test_preview_requires_token_when_configured() {
    let config = TestConfigBuilder::new().with_preview_token("sesame").build();
    let env = TestEnv::with_config(config).await.unwrap();
    let app = env.router().unwrap();

    let denied = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/?preview=1&token=wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::OK);
    assert!(body_string(denied).await.contains("up and running"));

    let allowed = app
        .oneshot(
            Request::builder()
                .uri("/?preview=1&token=sesame")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
    assert!(body_string(allowed).await.contains("Site Under Maintenance"));
}

#[tokio::test]
async fn test_status_endpoint_reports_active_window() {
    let env = TestEnv::new().await.unwrap();
    env.save_window(true, "2020-01-01T00:00", "2099-01-01T00:00", "UTC")
        .await
        .unwrap();
    let app = env.router().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["maintenance_active"], json!(true));
    assert_eq!(body["data"]["state"]["kind"], json!("active"));
}

#[tokio::test]
async fn test_update_window_via_api_takes_effect() {
    let env = TestEnv::new().await.unwrap();
    let app = env.router().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/settings/window")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "enabled": true,
                        "start": "2020-01-01T00:00",
                        "end": "2099-01-01T00:00",
                        "timezone": "UTC"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["state"]["kind"], json!("active"));

    let page = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_update_window_rejects_unknown_timezone() {
    let env = TestEnv::new().await.unwrap();
    let app = env.router().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/settings/window")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "enabled": true,
                        "start": "2020-01-01T00:00",
                        "end": "2099-01-01T00:00",
                        "timezone": "Mars/Olympus"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_message_crud_roundtrip() {
    let env = TestEnv::new().await.unwrap();
    let app = env.router().unwrap();

    let put = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/messages/sv")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "heading": "Underhåll pågår",
                        "description": "<p>Vi är strax tillbaka.</p>"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(put.status(), StatusCode::OK);

    let get = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/messages/sv")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(get.status(), StatusCode::OK);
    let body = body_json(get).await;
    assert_eq!(body["data"]["heading"], json!("Underhåll pågår"));

    let delete = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/messages/sv")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(delete.status(), StatusCode::OK);

    let missing = app
        .oneshot(
            Request::builder()
                .uri("/api/messages/sv")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_message_api_rejects_bad_language_codes() {
    let env = TestEnv::new().await.unwrap();
    let app = env.router().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/messages/sv2%2F..")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "heading": "x", "description": "y" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cache_clear_endpoint_drops_cached_facts() {
    let env = TestEnv::new().await.unwrap();
    env.save_window(true, "2020-01-01T00:00", "2020-01-02T00:00", "UTC")
        .await
        .unwrap();
    // Cache the "ended" conclusion
    assert!(!env.evaluator.should_show_maintenance().await);
    assert!(!env.transients.snapshot().await.is_empty());

    let app = env.router().unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/cache/clear")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(env.transients.snapshot().await.is_empty());
}

#[tokio::test]
async fn test_page_honours_lang_query() {
    let env = TestEnv::new().await.unwrap();
    env.save_window(true, "2020-01-01T00:00", "2099-01-01T00:00", "UTC")
        .await
        .unwrap();
    env.settings
        .set(
            maintenance_page::constants::keys::CONFIGURED_LANGUAGES,
            r#"{"en":"English","sv":"Svenska"}"#,
        )
        .await
        .unwrap();
    env.add_message("sv", "Underhåll pågår", "Vi är strax tillbaka.")
        .await
        .unwrap();
    let app = env.router().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?lang=sv")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body_string(response).await.contains("Underhåll pågår"));
}
