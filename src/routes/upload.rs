//! Image upload proxy. The browser posts a multipart form; the file is
//! forwarded to the media service and its HTTPS URL returned.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::Json;

use crate::error::ApiError;
use crate::routes::auth::AuthUser;
use crate::services::upload::{MediaUploader, UploadError, UploadFile, UploadedImage};
use crate::state::AppState;

/// Largest accepted request body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const FILE_FIELD: &str = "file";

/// Pull the `file` field out of the form, if present and non-empty.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadFile>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart request: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_owned();
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("multipart error: {e}")))?;
        if bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(UploadFile { file_name, content_type, bytes: bytes.to_vec() }));
    }
    Ok(None)
}

/// Forward the form's file to `uploader`.
async fn forward_upload(
    uploader: Option<Arc<dyn MediaUploader>>,
    mut multipart: Multipart,
) -> Result<UploadedImage, ApiError> {
    let uploader = uploader.ok_or(UploadError::NotConfigured)?;
    let file = read_file_field(&mut multipart).await?.ok_or(UploadError::NoFile)?;
    Ok(uploader.upload(file).await?)
}

/// `POST /api/upload`: multipart field `file`.
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<Json<UploadedImage>, ApiError> {
    let uploaded = forward_upload(state.uploader.clone(), multipart).await?;
    tracing::info!(user_id = %auth.user.id, url = %uploaded.secure_url, "image uploaded");
    Ok(Json(uploaded))
}

#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;
