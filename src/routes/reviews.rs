//! Guest review moderation routes.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::auth::HotelOwner;
use crate::services::paging::Page;
use crate::services::review::{self, Review, ReviewQuery, ReviewStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplyBody {
    pub reply: String,
}

/// `GET /api/reviews?status=&q=&sort=&page=`
pub async fn list_reviews(
    State(state): State<AppState>,
    owner: HotelOwner,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<Page<Review>>, ApiError> {
    Ok(Json(review::list_reviews(&state.pool, owner.hotel_id, &query).await?))
}

/// `PATCH /api/reviews/:id/status`
pub async fn set_status(
    State(state): State<AppState>,
    owner: HotelOwner,
    Path(review_id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Review>, ApiError> {
    let status: ReviewStatus = body.status.parse()?;
    Ok(Json(review::set_status(&state.pool, owner.hotel_id, review_id, status).await?))
}

/// `POST /api/reviews/:id/reply`
pub async fn reply(
    State(state): State<AppState>,
    owner: HotelOwner,
    Path(review_id): Path<Uuid>,
    Json(body): Json<ReplyBody>,
) -> Result<Json<Review>, ApiError> {
    Ok(Json(review::reply(&state.pool, owner.hotel_id, review_id, &body.reply).await?))
}
