//! Public hotel page: profile, room types, availability, booking and the
//! chat assistant. Only booking needs a signed-in guest.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::auth::AuthUser;
use crate::services::booking::{self, BookingRequest, Quote, StayRequest};
use crate::services::chat::{self, ChatReply, ChatRequest};
use crate::services::hotel::{self, PublicHotel};
use crate::services::reservation::Reservation;
use crate::services::review::{self, Review};
use crate::services::room::{self, RoomType};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PublicHotelPage {
    #[serde(flatten)]
    pub hotel: PublicHotel,
    pub room_types: Vec<RoomType>,
    pub reviews: Vec<Review>,
}

/// `GET /api/public/hotels/:id`: profile, room types and published reviews.
pub async fn hotel_page(
    State(state): State<AppState>,
    Path(hotel_id): Path<Uuid>,
) -> Result<Json<PublicHotelPage>, ApiError> {
    let hotel = hotel::get_public_hotel(&state.pool, hotel_id).await?;
    let room_types = room::list_room_types(&state.pool, hotel.id).await?;
    let reviews = review::list_published_reviews(&state.pool, hotel.id).await?;
    Ok(Json(PublicHotelPage { hotel: hotel.into(), room_types, reviews }))
}

/// `GET /api/public/hotels/:id/room-types`
pub async fn room_types(
    State(state): State<AppState>,
    Path(hotel_id): Path<Uuid>,
) -> Result<Json<Vec<RoomType>>, ApiError> {
    let hotel = hotel::get_public_hotel(&state.pool, hotel_id).await?;
    Ok(Json(room::list_room_types(&state.pool, hotel.id).await?))
}

/// `POST /api/public/hotels/:id/availability`: room types that fit the party,
/// priced for the stay.
pub async fn availability(
    State(state): State<AppState>,
    Path(hotel_id): Path<Uuid>,
    Json(body): Json<StayRequest>,
) -> Result<Json<Vec<Quote>>, ApiError> {
    let hotel = hotel::get_public_hotel(&state.pool, hotel_id).await?;
    Ok(Json(booking::check_availability(&state.pool, &hotel, &body).await?))
}

/// `POST /api/public/hotels/:id/bookings`: guest self-service booking.
pub async fn book(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(hotel_id): Path<Uuid>,
    Json(body): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    let hotel = hotel::get_public_hotel(&state.pool, hotel_id).await?;
    let reservation = booking::book(&state.pool, &hotel, &auth.user, &body).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// `POST /api/public/hotels/:id/chat`
pub async fn chat(
    State(state): State<AppState>,
    Path(hotel_id): Path<Uuid>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let hotel = hotel::get_public_hotel(&state.pool, hotel_id).await?;
    let reply = chat::handle_message(state.assistant.as_ref(), &state.rate_limiter, &hotel, &body).await?;
    Ok(Json(reply))
}

#[cfg(test)]
#[path = "public_test.rs"]
mod tests;
