//! Gallery service: the hotel's public photo gallery.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::validate::clean_list;

/// Upper bound on gallery images per hotel.
pub const MAX_GALLERY_IMAGES: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error("a maximum of 20 images can be uploaded")]
    LimitExceeded,
    #[error("no image urls given")]
    Empty,
    #[error("image not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl crate::error::ErrorCode for GalleryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::LimitExceeded => "E_GALLERY_FULL",
            Self::Empty => "E_VALIDATION",
            Self::NotFound(_) => "E_IMAGE_NOT_FOUND",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::LimitExceeded | Self::Empty => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct GalleryImage {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub url: String,
    pub public_id: String,
    pub image_type: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GalleryInput {
    pub urls: Vec<String>,
}

/// Media-service id of an uploaded asset: the last path segment up to its
/// first dot.
#[must_use]
pub fn public_id_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();
    segment.split('.').next().unwrap_or_default().to_owned()
}

/// Whether `adding` more images keeps the gallery within its cap.
#[must_use]
pub fn fits_limit(existing: usize, adding: usize) -> bool {
    existing.saturating_add(adding) <= MAX_GALLERY_IMAGES
}

/// Gallery images, newest first.
pub async fn list_images(pool: &PgPool, hotel_id: Uuid) -> Result<Vec<GalleryImage>, GalleryError> {
    let rows = sqlx::query_as::<_, GalleryImage>(
        "SELECT id, hotel_id, url, public_id, image_type, created_at
         FROM hotel_images
         WHERE hotel_id = $1 AND image_type = 'gallery'
         ORDER BY created_at DESC",
    )
    .bind(hotel_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Record freshly uploaded images.
///
/// # Errors
///
/// Returns `LimitExceeded` when the gallery would pass the cap.
pub async fn add_images(pool: &PgPool, hotel_id: Uuid, urls: Vec<String>) -> Result<Vec<GalleryImage>, GalleryError> {
    let urls = clean_list(urls);
    if urls.is_empty() {
        return Err(GalleryError::Empty);
    }

    let mut tx = pool.begin().await?;
    // Row lock on the hotel serializes concurrent uploads until commit.
    sqlx::query("SELECT 1 FROM hotels WHERE id = $1 FOR UPDATE")
        .bind(hotel_id)
        .fetch_optional(&mut *tx)
        .await?;
    let existing: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM hotel_images WHERE hotel_id = $1 AND image_type = 'gallery'")
            .bind(hotel_id)
            .fetch_one(&mut *tx)
            .await?;
    if !fits_limit(usize::try_from(existing).unwrap_or(usize::MAX), urls.len()) {
        return Err(GalleryError::LimitExceeded);
    }

    let mut inserted = Vec::with_capacity(urls.len());
    for url in &urls {
        let image = sqlx::query_as::<_, GalleryImage>(
            "INSERT INTO hotel_images (hotel_id, url, public_id, image_type)
             VALUES ($1, $2, $3, 'gallery')
             RETURNING id, hotel_id, url, public_id, image_type, created_at",
        )
        .bind(hotel_id)
        .bind(url)
        .bind(public_id_from_url(url))
        .fetch_one(&mut *tx)
        .await?;
        inserted.push(image);
    }
    tx.commit().await?;

    tracing::info!(%hotel_id, count = inserted.len(), "gallery images added");
    Ok(inserted)
}

/// # Errors
///
/// Returns `NotFound` when the image is not in the hotel's gallery.
pub async fn delete_image(pool: &PgPool, hotel_id: Uuid, image_id: Uuid) -> Result<(), GalleryError> {
    let result = sqlx::query("DELETE FROM hotel_images WHERE id = $1 AND hotel_id = $2 AND image_type = 'gallery'")
        .bind(image_id)
        .bind(hotel_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(GalleryError::NotFound(image_id));
    }
    Ok(())
}

#[cfg(test)]
#[path = "gallery_test.rs"]
mod tests;
