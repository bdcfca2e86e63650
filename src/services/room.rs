//! Room service: physical rooms and the room types they are sold as.
//!
//! DESIGN
//! ======
//! Rooms optionally point at a room type of the same hotel. Listing joins the
//! type in so the rooms table and the reservation picker can show name,
//! capacity and price without a second round trip. Every query carries the
//! caller's `hotel_id`; ids from another property resolve as not found.

use std::fmt;
use std::str::FromStr;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use uuid::Uuid;

use super::validate::{clean_optional, non_blank};

/// Shown when a room has no photo of its own.
pub const DEFAULT_ROOM_IMAGE: &str = "/stock-hotel-room.jpg";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("room not found: {0}")]
    NotFound(Uuid),
    #[error("room type not found: {0}")]
    RoomTypeNotFound(Uuid),
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl crate::error::ErrorCode for RoomError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_ROOM_NOT_FOUND",
            Self::RoomTypeNotFound(_) => "E_ROOM_TYPE_NOT_FOUND",
            Self::Validation(_) => "E_VALIDATION",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::RoomTypeNotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

impl RoomStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomStatus {
    type Err = RoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "occupied" => Ok(Self::Occupied),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(RoomError::Validation(format!("unknown room status '{other}'"))),
        }
    }
}

/// Room type as embedded in room listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomTypeSummary {
    pub id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub base_price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Room {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub room_number: String,
    pub floor: String,
    pub room_type_id: Option<Uuid>,
    pub status: RoomStatus,
    pub image_url: String,
    pub thumbnail_url: Option<String>,
    pub room_type: Option<RoomTypeSummary>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RoomType {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub name: String,
    pub description: String,
    pub capacity: i32,
    pub base_price: f64,
    pub image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl RoomType {
    /// Whether a party of `guests` fits this type.
    #[must_use]
    pub fn fits(&self, guests: i32) -> bool {
        self.capacity >= guests
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoomInput {
    pub room_number: String,
    pub floor: String,
    pub room_type_id: Option<Uuid>,
    pub status: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Validated room fields ready to bind.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomFields {
    pub room_number: String,
    pub floor: String,
    pub room_type_id: Option<Uuid>,
    pub status: RoomStatus,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl RoomInput {
    /// # Errors
    ///
    /// Returns `Validation` for a blank number or floor, or an unknown status.
    pub fn validate(self) -> Result<RoomFields, RoomError> {
        let room_number =
            non_blank(&self.room_number).ok_or_else(|| RoomError::Validation("room number is required".into()))?;
        let floor = non_blank(&self.floor).ok_or_else(|| RoomError::Validation("floor is required".into()))?;
        let status = match clean_optional(self.status) {
            Some(raw) => raw.parse()?,
            None => RoomStatus::Available,
        };
        Ok(RoomFields {
            room_number,
            floor,
            room_type_id: self.room_type_id,
            status,
            image_url: clean_optional(self.image_url),
            thumbnail_url: clean_optional(self.thumbnail_url),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoomTypeInput {
    pub name: String,
    pub description: String,
    pub capacity: i32,
    pub base_price: f64,
    pub image_url: Option<String>,
}

impl RoomTypeInput {
    /// # Errors
    ///
    /// Returns `Validation` for a blank name, capacity below 1 or a negative price.
    pub fn validate(self) -> Result<Self, RoomError> {
        let name = non_blank(&self.name).ok_or_else(|| RoomError::Validation("name is required".into()))?;
        if self.capacity < 1 {
            return Err(RoomError::Validation("capacity must be at least 1".into()));
        }
        if !self.base_price.is_finite() || self.base_price < 0.0 {
            return Err(RoomError::Validation("base price must not be negative".into()));
        }
        Ok(Self {
            name,
            description: self.description.trim().to_owned(),
            capacity: self.capacity,
            base_price: self.base_price,
            image_url: clean_optional(self.image_url),
        })
    }
}

// =============================================================================
// ROOMS
// =============================================================================

const ROOM_SELECT: &str = "SELECT r.id, r.hotel_id, r.room_number, r.floor, r.room_type_id, r.status,
            r.image_url, r.thumbnail_url, r.created_at, r.updated_at,
            t.name AS type_name, t.capacity AS type_capacity, t.base_price AS type_base_price
     FROM rooms r
     LEFT JOIN room_types t ON t.id = r.room_type_id";

fn room_from_row(row: &PgRow) -> Result<Room, RoomError> {
    let room_type_id: Option<Uuid> = row.get("room_type_id");
    let type_name: Option<String> = row.get("type_name");
    let room_type = room_type_id.zip(type_name).map(|(id, name)| RoomTypeSummary {
        id,
        name,
        capacity: row.get::<Option<i32>, _>("type_capacity").unwrap_or(1),
        base_price: row.get::<Option<f64>, _>("type_base_price").unwrap_or(0.0),
    });
    let status: String = row.get("status");

    Ok(Room {
        id: row.get("id"),
        hotel_id: row.get("hotel_id"),
        room_number: row.get("room_number"),
        floor: row.get("floor"),
        room_type_id,
        status: status.parse()?,
        image_url: row
            .get::<Option<String>, _>("image_url")
            .unwrap_or_else(|| DEFAULT_ROOM_IMAGE.to_owned()),
        thumbnail_url: row.get("thumbnail_url"),
        room_type,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// All rooms of the hotel, ordered by room number.
pub async fn list_rooms(pool: &PgPool, hotel_id: Uuid) -> Result<Vec<Room>, RoomError> {
    let rows = sqlx::query(&format!("{ROOM_SELECT} WHERE r.hotel_id = $1 ORDER BY r.room_number"))
        .bind(hotel_id)
        .fetch_all(pool)
        .await?;
    rows.iter().map(room_from_row).collect()
}

/// Rooms currently marked available, for the reservation form picker.
pub async fn list_available_rooms(pool: &PgPool, hotel_id: Uuid) -> Result<Vec<Room>, RoomError> {
    let rows = sqlx::query(&format!(
        "{ROOM_SELECT} WHERE r.hotel_id = $1 AND r.status = 'available' ORDER BY r.room_number"
    ))
    .bind(hotel_id)
    .fetch_all(pool)
    .await?;
    rows.iter().map(room_from_row).collect()
}

/// Fetch one room of the hotel.
///
/// # Errors
///
/// Returns `NotFound` when the room is absent or belongs to another hotel.
pub async fn get_room(pool: &PgPool, hotel_id: Uuid, room_id: Uuid) -> Result<Room, RoomError> {
    let row = sqlx::query(&format!("{ROOM_SELECT} WHERE r.hotel_id = $1 AND r.id = $2"))
        .bind(hotel_id)
        .bind(room_id)
        .fetch_optional(pool)
        .await?
        .ok_or(RoomError::NotFound(room_id))?;
    room_from_row(&row)
}

/// Whether `room_id` is one of the hotel's rooms.
pub async fn room_belongs_to_hotel(pool: &PgPool, hotel_id: Uuid, room_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM rooms WHERE id = $1 AND hotel_id = $2)")
        .bind(room_id)
        .bind(hotel_id)
        .fetch_one(pool)
        .await
}

async fn ensure_room_type(pool: &PgPool, hotel_id: Uuid, room_type_id: Option<Uuid>) -> Result<(), RoomError> {
    let Some(id) = room_type_id else {
        return Ok(());
    };
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM room_types WHERE id = $1 AND hotel_id = $2)")
        .bind(id)
        .bind(hotel_id)
        .fetch_one(pool)
        .await?;
    if exists { Ok(()) } else { Err(RoomError::RoomTypeNotFound(id)) }
}

/// Add a room to the hotel.
///
/// # Errors
///
/// Returns `Validation` for bad input and `RoomTypeNotFound` for a foreign type.
pub async fn create_room(pool: &PgPool, hotel_id: Uuid, input: RoomInput) -> Result<Room, RoomError> {
    let fields = input.validate()?;
    ensure_room_type(pool, hotel_id, fields.room_type_id).await?;

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO rooms (hotel_id, room_number, floor, room_type_id, status, image_url, thumbnail_url)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id",
    )
    .bind(hotel_id)
    .bind(&fields.room_number)
    .bind(&fields.floor)
    .bind(fields.room_type_id)
    .bind(fields.status.as_str())
    .bind(&fields.image_url)
    .bind(&fields.thumbnail_url)
    .fetch_one(pool)
    .await?;

    tracing::info!(%hotel_id, room_id = %id, room_number = %fields.room_number, "room created");
    get_room(pool, hotel_id, id).await
}

/// Replace a room's fields.
///
/// # Errors
///
/// Returns `NotFound` if the room is not the hotel's.
pub async fn update_room(pool: &PgPool, hotel_id: Uuid, room_id: Uuid, input: RoomInput) -> Result<Room, RoomError> {
    let fields = input.validate()?;
    ensure_room_type(pool, hotel_id, fields.room_type_id).await?;

    let result = sqlx::query(
        "UPDATE rooms SET room_number = $3, floor = $4, room_type_id = $5, status = $6,
             image_url = $7, thumbnail_url = $8, updated_at = now()
         WHERE id = $1 AND hotel_id = $2",
    )
    .bind(room_id)
    .bind(hotel_id)
    .bind(&fields.room_number)
    .bind(&fields.floor)
    .bind(fields.room_type_id)
    .bind(fields.status.as_str())
    .bind(&fields.image_url)
    .bind(&fields.thumbnail_url)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RoomError::NotFound(room_id));
    }
    get_room(pool, hotel_id, room_id).await
}

/// Remove a room. Reservations keep their row with the room reference cleared.
///
/// # Errors
///
/// Returns `NotFound` if the room is not the hotel's.
pub async fn delete_room(pool: &PgPool, hotel_id: Uuid, room_id: Uuid) -> Result<(), RoomError> {
    let result = sqlx::query("DELETE FROM rooms WHERE id = $1 AND hotel_id = $2")
        .bind(room_id)
        .bind(hotel_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RoomError::NotFound(room_id));
    }
    tracing::info!(%hotel_id, %room_id, "room deleted");
    Ok(())
}

// =============================================================================
// ROOM TYPES
// =============================================================================

const ROOM_TYPE_COLUMNS: &str = "id, hotel_id, name, description, capacity, base_price, image_url, created_at";

/// Room types of the hotel ordered by name.
pub async fn list_room_types(pool: &PgPool, hotel_id: Uuid) -> Result<Vec<RoomType>, RoomError> {
    let rows = sqlx::query_as::<_, RoomType>(&format!(
        "SELECT {ROOM_TYPE_COLUMNS} FROM room_types WHERE hotel_id = $1 ORDER BY name"
    ))
    .bind(hotel_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns `RoomTypeNotFound` when the type is absent or belongs to another hotel.
pub async fn get_room_type(pool: &PgPool, hotel_id: Uuid, room_type_id: Uuid) -> Result<RoomType, RoomError> {
    sqlx::query_as::<_, RoomType>(&format!(
        "SELECT {ROOM_TYPE_COLUMNS} FROM room_types WHERE id = $1 AND hotel_id = $2"
    ))
    .bind(room_type_id)
    .bind(hotel_id)
    .fetch_optional(pool)
    .await?
    .ok_or(RoomError::RoomTypeNotFound(room_type_id))
}

/// # Errors
///
/// Returns `Validation` for bad input.
pub async fn create_room_type(pool: &PgPool, hotel_id: Uuid, input: RoomTypeInput) -> Result<RoomType, RoomError> {
    let input = input.validate()?;
    let row = sqlx::query_as::<_, RoomType>(&format!(
        "INSERT INTO room_types (hotel_id, name, description, capacity, base_price, image_url)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {ROOM_TYPE_COLUMNS}"
    ))
    .bind(hotel_id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.capacity)
    .bind(input.base_price)
    .bind(&input.image_url)
    .fetch_one(pool)
    .await?;
    tracing::info!(%hotel_id, room_type_id = %row.id, name = %row.name, "room type created");
    Ok(row)
}

/// # Errors
///
/// Returns `RoomTypeNotFound` if the type is not the hotel's.
pub async fn update_room_type(
    pool: &PgPool,
    hotel_id: Uuid,
    room_type_id: Uuid,
    input: RoomTypeInput,
) -> Result<RoomType, RoomError> {
    let input = input.validate()?;
    sqlx::query_as::<_, RoomType>(&format!(
        "UPDATE room_types SET name = $3, description = $4, capacity = $5, base_price = $6, image_url = $7
         WHERE id = $1 AND hotel_id = $2
         RETURNING {ROOM_TYPE_COLUMNS}"
    ))
    .bind(room_type_id)
    .bind(hotel_id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.capacity)
    .bind(input.base_price)
    .bind(&input.image_url)
    .fetch_optional(pool)
    .await?
    .ok_or(RoomError::RoomTypeNotFound(room_type_id))
}

/// # Errors
///
/// Returns `RoomTypeNotFound` if the type is not the hotel's.
pub async fn delete_room_type(pool: &PgPool, hotel_id: Uuid, room_type_id: Uuid) -> Result<(), RoomError> {
    let result = sqlx::query("DELETE FROM room_types WHERE id = $1 AND hotel_id = $2")
        .bind(room_type_id)
        .bind(hotel_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RoomError::RoomTypeNotFound(room_type_id));
    }
    Ok(())
}

#[cfg(test)]
#[path = "room_test.rs"]
mod tests;
