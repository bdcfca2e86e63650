//! Room and room type management routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::auth::HotelOwner;
use crate::services::room::{self, Room, RoomInput, RoomType, RoomTypeInput};
use crate::state::AppState;

/// `GET /api/rooms`: every room, ordered by number.
pub async fn list_rooms(State(state): State<AppState>, owner: HotelOwner) -> Result<Json<Vec<Room>>, ApiError> {
    Ok(Json(room::list_rooms(&state.pool, owner.hotel_id).await?))
}

/// `GET /api/rooms/available`: rooms the reservation form may assign.
pub async fn list_available_rooms(
    State(state): State<AppState>,
    owner: HotelOwner,
) -> Result<Json<Vec<Room>>, ApiError> {
    Ok(Json(room::list_available_rooms(&state.pool, owner.hotel_id).await?))
}

/// `POST /api/rooms`
pub async fn create_room(
    State(state): State<AppState>,
    owner: HotelOwner,
    Json(body): Json<RoomInput>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    let created = room::create_room(&state.pool, owner.hotel_id, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/rooms/:id`
pub async fn update_room(
    State(state): State<AppState>,
    owner: HotelOwner,
    Path(room_id): Path<Uuid>,
    Json(body): Json<RoomInput>,
) -> Result<Json<Room>, ApiError> {
    Ok(Json(room::update_room(&state.pool, owner.hotel_id, room_id, body).await?))
}

/// `DELETE /api/rooms/:id`
pub async fn delete_room(
    State(state): State<AppState>,
    owner: HotelOwner,
    Path(room_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    room::delete_room(&state.pool, owner.hotel_id, room_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/room-types`
pub async fn list_room_types(
    State(state): State<AppState>,
    owner: HotelOwner,
) -> Result<Json<Vec<RoomType>>, ApiError> {
    Ok(Json(room::list_room_types(&state.pool, owner.hotel_id).await?))
}

/// `POST /api/room-types`
pub async fn create_room_type(
    State(state): State<AppState>,
    owner: HotelOwner,
    Json(body): Json<RoomTypeInput>,
) -> Result<(StatusCode, Json<RoomType>), ApiError> {
    let created = room::create_room_type(&state.pool, owner.hotel_id, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/room-types/:id`
pub async fn update_room_type(
    State(state): State<AppState>,
    owner: HotelOwner,
    Path(room_type_id): Path<Uuid>,
    Json(body): Json<RoomTypeInput>,
) -> Result<Json<RoomType>, ApiError> {
    Ok(Json(room::update_room_type(&state.pool, owner.hotel_id, room_type_id, body).await?))
}

/// `DELETE /api/room-types/:id`
pub async fn delete_room_type(
    State(state): State<AppState>,
    owner: HotelOwner,
    Path(room_type_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    room::delete_room_type(&state.pool, owner.hotel_id, room_type_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
