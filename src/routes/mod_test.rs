use super::*;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::services::upload::{MediaUploader, UploadError, UploadFile, UploadedImage};
use crate::state::test_helpers::{test_app_state, test_app_state_with_uploader};

struct NeverUploader;

#[async_trait]
impl MediaUploader for NeverUploader {
    async fn upload(&self, _file: UploadFile) -> Result<UploadedImage, UploadError> {
        panic!("unauthenticated requests must not reach the uploader");
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn healthz_ok() {
    let response = app(test_app_state())
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn dashboard_routes_require_session() {
    for uri in ["/api/rooms", "/api/reservations?page=2", "/api/reviews", "/api/dashboard", "/api/profile"] {
        let response = app(test_app_state())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["code"], "E_UNAUTHORIZED");
    }
}

#[tokio::test]
async fn upload_requires_session() {
    let state = test_app_state_with_uploader(Arc::new(NeverUploader));
    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header("content-type", "multipart/form-data; boundary=X")
        .body(Body::from("--X--\r\n"))
        .unwrap();
    let response = app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_route_rejects_malformed_id() {
    let response = app(test_app_state())
        .oneshot(Request::builder().uri("/api/public/hotels/not-a-uuid").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_rejects_body_without_session_id() {
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/public/hotels/{}/chat", uuid::Uuid::new_v4()))
        .header("content-type", "application/json")
        .body(Body::from(r#"{"message":"hi"}"#))
        .unwrap();
    let response = app(test_app_state()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let response = app(test_app_state())
        .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
