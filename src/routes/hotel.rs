//! Hotel profile and dashboard routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ApiError;
use crate::routes::auth::{AuthUser, HotelOwner};
use crate::services::hotel::{self, Hotel, HotelError, HotelInput};
use crate::services::stats::{self, HotelStats};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// True until the caller has created a hotel.
    pub welcome: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<HotelStats>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MediaBody {
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
}

/// `GET /api/hotel`: the caller's hotel.
pub async fn get_hotel(State(state): State<AppState>, owner: HotelOwner) -> Result<Json<Hotel>, ApiError> {
    Ok(Json(hotel::get_hotel(&state.pool, owner.hotel_id).await?))
}

/// `POST /api/hotel`: onboarding; one hotel per user.
pub async fn create_hotel(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<HotelInput>,
) -> Result<(StatusCode, Json<Hotel>), ApiError> {
    let created = hotel::create_hotel(&state.pool, auth.user.id, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/hotel`: replace the editable profile fields.
pub async fn update_hotel(
    State(state): State<AppState>,
    owner: HotelOwner,
    Json(body): Json<HotelInput>,
) -> Result<Json<Hotel>, ApiError> {
    Ok(Json(hotel::update_hotel(&state.pool, owner.hotel_id, body).await?))
}

/// `PATCH /api/hotel/media`: logo and cover image.
pub async fn update_media(
    State(state): State<AppState>,
    owner: HotelOwner,
    Json(body): Json<MediaBody>,
) -> Result<Json<Hotel>, ApiError> {
    if body.logo_url.is_none() && body.cover_url.is_none() {
        return Err(ApiError::bad_request("logo_url or cover_url is required"));
    }
    let updated = hotel::set_media(&state.pool, owner.hotel_id, body.logo_url, body.cover_url).await?;
    Ok(Json(updated))
}

/// `GET /api/dashboard`: welcome flag for new operators, KPIs otherwise.
pub async fn dashboard(State(state): State<AppState>, auth: AuthUser) -> Result<Json<DashboardResponse>, ApiError> {
    let owned = match hotel::owned_hotel(&state.pool, auth.user.id).await {
        Ok(owned) => owned,
        Err(HotelError::NoHotel) => return Ok(Json(DashboardResponse { welcome: true, stats: None })),
        Err(e) => return Err(e.into()),
    };
    let (hotel_id, hotel_name) = owned;
    let today = OffsetDateTime::now_utc().date();
    let stats = stats::hotel_stats(&state.pool, hotel_id, hotel_name, today)
        .await
        .map_err(HotelError::from)?;
    Ok(Json(DashboardResponse { welcome: false, stats: Some(stats) }))
}

#[cfg(test)]
#[path = "hotel_test.rs"]
mod tests;
