use super::*;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::FromRequest;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use http_body_util::BodyExt;

const BOUNDARY: &str = "HOTELIER-BOUNDARY";

/// Records what it received and answers with a canned result.
struct StubUploader {
    result: Result<UploadedImage, UploadError>,
    received: Mutex<Vec<UploadFile>>,
}

impl StubUploader {
    fn answering(result: Result<UploadedImage, UploadError>) -> Arc<Self> {
        Arc::new(Self { result, received: Mutex::new(Vec::new()) })
    }
}

fn configured(stub: &Arc<StubUploader>) -> Option<Arc<dyn MediaUploader>> {
    let uploader: Arc<dyn MediaUploader> = stub.clone();
    Some(uploader)
}

#[async_trait]
impl MediaUploader for StubUploader {
    async fn upload(&self, file: UploadFile) -> Result<UploadedImage, UploadError> {
        self.received.lock().unwrap().push(file);
        match &self.result {
            Ok(image) => Ok(image.clone()),
            Err(UploadError::Upstream(message)) => Err(UploadError::Upstream(message.clone())),
            Err(_) => Err(UploadError::MissingSecureUrl),
        }
    }
}

fn part(name: &str, file_name: Option<&str>, content: &str) -> String {
    let disposition = match file_name {
        Some(file_name) => format!("form-data; name=\"{name}\"; filename=\"{file_name}\""),
        None => format!("form-data; name=\"{name}\""),
    };
    format!("--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: image/png\r\n\r\n{content}\r\n")
}

async fn multipart(parts: &[String]) -> Multipart {
    let body = format!("{}--{BOUNDARY}--\r\n", parts.concat());
    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap();
    Multipart::from_request(request, &()).await.unwrap()
}

async fn error_response(err: ApiError) -> (StatusCode, serde_json::Value) {
    let response: Response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn uploaded() -> UploadedImage {
    UploadedImage { secure_url: "https://res.cloudinary.com/demo/hotel_images/pool.png".into() }
}

#[tokio::test]
async fn form_without_file_is_bad_request() {
    let stub = StubUploader::answering(Ok(uploaded()));
    let form = multipart(&[part("caption", None, "pool at dusk")]).await;

    let err = forward_upload(configured(&stub), form).await.unwrap_err();
    let (status, body) = error_response(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file uploaded");
    assert!(stub.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_file_is_bad_request() {
    let stub = StubUploader::answering(Ok(uploaded()));
    let form = multipart(&[part("file", Some("empty.png"), "")]).await;

    let (status, body) = error_response(forward_upload(configured(&stub), form).await.unwrap_err()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file uploaded");
}

#[tokio::test]
async fn missing_uploader_is_unavailable() {
    let form = multipart(&[part("file", Some("pool.png"), "PNGDATA")]).await;

    let (status, body) = error_response(forward_upload(None, form).await.unwrap_err()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn upstream_failure_surfaces_message() {
    let stub = StubUploader::answering(Err(UploadError::Upstream("boom".into())));
    let form = multipart(&[part("file", Some("pool.png"), "PNGDATA")]).await;

    let (status, body) = error_response(forward_upload(configured(&stub), form).await.unwrap_err()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "boom");
}

#[tokio::test]
async fn file_field_is_forwarded() {
    let stub = StubUploader::answering(Ok(uploaded()));
    let form = multipart(&[part("caption", None, "ignored"), part("file", Some("pool.png"), "PNGDATA")]).await;

    let image = forward_upload(configured(&stub), form).await.unwrap();
    assert_eq!(image, uploaded());

    let received = stub.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].file_name, "pool.png");
    assert_eq!(received[0].content_type.as_deref(), Some("image/png"));
    assert_eq!(received[0].bytes, b"PNGDATA");
}
