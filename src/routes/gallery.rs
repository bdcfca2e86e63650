//! Hotel photo gallery routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::auth::HotelOwner;
use crate::services::gallery::{self, GalleryImage, GalleryInput};
use crate::state::AppState;

/// `GET /api/gallery`
pub async fn list_images(
    State(state): State<AppState>,
    owner: HotelOwner,
) -> Result<Json<Vec<GalleryImage>>, ApiError> {
    Ok(Json(gallery::list_images(&state.pool, owner.hotel_id).await?))
}

/// `POST /api/gallery`: register already-uploaded image URLs.
pub async fn add_images(
    State(state): State<AppState>,
    owner: HotelOwner,
    Json(body): Json<GalleryInput>,
) -> Result<(StatusCode, Json<Vec<GalleryImage>>), ApiError> {
    let added = gallery::add_images(&state.pool, owner.hotel_id, body.urls).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

/// `DELETE /api/gallery/:id`
pub async fn delete_image(
    State(state): State<AppState>,
    owner: HotelOwner,
    Path(image_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    gallery::delete_image(&state.pool, owner.hotel_id, image_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
