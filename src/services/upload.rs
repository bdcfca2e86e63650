//! Media upload proxy: forwards an image to the media service.
//!
//! Cloudinary signed upload: the signature is the SHA-256 hex digest of the
//! sorted `key=value` parameters joined by `&`, followed by the API secret.
//! `file` and `api_key` are sent but not signed.

use std::fmt::Write;
use std::time::Duration;

use axum::http::StatusCode;
use serde::Serialize;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use crate::config::CloudinaryConfig;

const REQUEST_TIMEOUT_SECS: u64 = 60;
const CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    NoFile,
    #[error("image uploads are not configured")]
    NotConfigured,
    #[error("Failed to get secure URL from Cloudinary")]
    MissingSecureUrl,
    #[error("{0}")]
    Upstream(String),
    #[error("failed to build http client: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for UploadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoFile => "E_NO_FILE",
            Self::NotConfigured => "E_UPLOAD_NOT_CONFIGURED",
            Self::MissingSecureUrl | Self::Upstream(_) => "E_UPLOAD_FAILED",
            Self::HttpClientBuild(_) => "E_INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NoFile => StatusCode::BAD_REQUEST,
            Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::MissingSecureUrl | Self::Upstream(_) | Self::HttpClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Upstream failures are reported to the uploader verbatim.
    fn is_internal(&self) -> bool {
        matches!(self, Self::HttpClientBuild(_))
    }
}

/// A file received from the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImage {
    pub secure_url: String,
}

/// Stores an image and returns its public HTTPS URL. Enables mocking in tests.
#[async_trait::async_trait]
pub trait MediaUploader: Send + Sync {
    /// # Errors
    ///
    /// Returns `Upstream` or `MissingSecureUrl` when the media service fails.
    async fn upload(&self, file: UploadFile) -> Result<UploadedImage, UploadError>;
}

// =============================================================================
// SIGNING
// =============================================================================

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Signature over `params` (sorted by key) and the API secret.
#[must_use]
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

/// Pull `secure_url` out of the media service's JSON reply. Error replies
/// carry `{"error": {"message": ...}}`.
///
/// # Errors
///
/// Returns `Upstream` with the service's message, or `MissingSecureUrl`.
pub fn parse_upload_response(status: u16, body: &str) -> Result<UploadedImage, UploadError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| UploadError::Upstream(format!("invalid upload response: {e}")))?;

    if !(200..300).contains(&status) {
        let message = json
            .pointer("/error/message")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| format!("upload failed with status {status}"), str::to_owned);
        return Err(UploadError::Upstream(message));
    }

    json.get("secure_url")
        .and_then(serde_json::Value::as_str)
        .filter(|url| !url.is_empty())
        .map(|url| UploadedImage { secure_url: url.to_owned() })
        .ok_or(UploadError::MissingSecureUrl)
}

// =============================================================================
// CLOUDINARY
// =============================================================================

pub struct CloudinaryUploader {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryUploader {
    /// # Errors
    ///
    /// Returns `HttpClientBuild` if the HTTP client cannot be created.
    pub fn new(config: CloudinaryConfig) -> Result<Self, UploadError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| UploadError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }
}

#[async_trait::async_trait]
impl MediaUploader for CloudinaryUploader {
    async fn upload(&self, file: UploadFile) -> Result<UploadedImage, UploadError> {
        let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();
        let signed = [("folder", self.config.folder.clone()), ("timestamp", timestamp.clone())];
        let signature = sign_params(&signed, &self.config.api_secret);

        let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| UploadError::Upstream(format!("invalid content type: {e}")))?;
        }
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("folder", self.config.folder.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .http
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Upstream(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| UploadError::Upstream(e.to_string()))?;
        let uploaded = parse_upload_response(status, &text)?;
        tracing::info!(url = %uploaded.secure_url, "image uploaded");
        Ok(uploaded)
    }
}

#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;
