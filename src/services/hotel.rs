//! Hotel service: the operator's property record and its public view.
//!
//! DESIGN
//! ======
//! Each operator owns at most one hotel (`hotels.user_id` is unique). Every
//! dashboard endpoint resolves the caller's hotel first and scopes its
//! queries by that id, so rows of other properties are never reachable.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::validate::{clean_list, clean_optional, non_blank, normalize_email};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum HotelError {
    #[error("no hotel associated with this user")]
    NoHotel,
    #[error("hotel not found: {0}")]
    NotFound(Uuid),
    #[error("this user already has a hotel")]
    AlreadyExists,
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl crate::error::ErrorCode for HotelError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoHotel => "E_NO_HOTEL",
            Self::NotFound(_) => "E_HOTEL_NOT_FOUND",
            Self::AlreadyExists => "E_HOTEL_EXISTS",
            Self::Validation(_) => "E_VALIDATION",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NoHotel | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A named service offered by the hotel (spa, airport shuttle, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelService {
    pub name: String,
    pub description: String,
}

/// Full hotel row. Mirrors the `hotels` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Hotel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
    pub gallery_urls: Vec<String>,
    pub features: Vec<String>,
    pub amenities: Vec<String>,
    #[sqlx(json)]
    pub services: Vec<HotelService>,
    pub public_profile: bool,
    pub chatbot_enabled: bool,
    pub booking_enabled: bool,
    pub check_in_time: String,
    pub check_out_time: String,
    pub rating: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Hotel fields shown on the public page. Owner and moderation details stay
/// private.
#[derive(Debug, Clone, Serialize)]
pub struct PublicHotel {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
    pub gallery_urls: Vec<String>,
    pub features: Vec<String>,
    pub amenities: Vec<String>,
    pub services: Vec<HotelService>,
    pub chatbot_enabled: bool,
    pub booking_enabled: bool,
    pub check_in_time: String,
    pub check_out_time: String,
    pub rating: f64,
}

impl From<Hotel> for PublicHotel {
    fn from(h: Hotel) -> Self {
        Self {
            id: h.id,
            name: h.name,
            description: h.description,
            email: h.email,
            phone: h.phone,
            website: h.website,
            address: h.address,
            city: h.city,
            country: h.country,
            postal_code: h.postal_code,
            latitude: h.latitude,
            longitude: h.longitude,
            logo_url: h.logo_url,
            cover_url: h.cover_url,
            gallery_urls: h.gallery_urls,
            features: h.features,
            amenities: h.amenities,
            services: h.services,
            chatbot_enabled: h.chatbot_enabled,
            booking_enabled: h.booking_enabled,
            check_in_time: h.check_in_time,
            check_out_time: h.check_out_time,
            rating: h.rating,
        }
    }
}

const HOTEL_COLUMNS: &str = "id, user_id, name, description, email, phone, website, address, city, country, \
     postal_code, latitude, longitude, logo_url, cover_url, gallery_urls, features, amenities, services, \
     public_profile, chatbot_enabled, booking_enabled, check_in_time, check_out_time, rating, created_at, updated_at";

/// Editable hotel fields, as submitted by the profile and public-profile forms.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HotelInput {
    pub name: String,
    pub description: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
    pub gallery_urls: Vec<String>,
    pub features: Vec<String>,
    pub amenities: Vec<String>,
    pub services: Vec<HotelService>,
    pub public_profile: bool,
    pub chatbot_enabled: bool,
    pub booking_enabled: bool,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
}

/// Which fields must be present for a write to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Onboarding: only the name is needed.
    Onboarding,
    /// Profile edit: every required form field.
    Profile,
}

impl HotelInput {
    /// Trim text, drop blank list entries and incomplete services, then check
    /// required fields.
    ///
    /// # Errors
    ///
    /// Returns `HotelError::Validation` naming the first offending field.
    pub fn normalize(self, strictness: Strictness) -> Result<Self, HotelError> {
        let trim = |s: String| s.trim().to_owned();
        let mut out = Self {
            name: trim(self.name),
            description: trim(self.description),
            email: trim(self.email),
            phone: trim(self.phone),
            website: trim(self.website),
            address: trim(self.address),
            city: trim(self.city),
            country: trim(self.country),
            postal_code: trim(self.postal_code),
            latitude: self.latitude,
            longitude: self.longitude,
            logo_url: clean_optional(self.logo_url),
            cover_url: clean_optional(self.cover_url),
            gallery_urls: clean_list(self.gallery_urls),
            features: clean_list(self.features),
            amenities: clean_list(self.amenities),
            services: self
                .services
                .into_iter()
                .filter_map(|s| {
                    Some(HotelService { name: non_blank(&s.name)?, description: non_blank(&s.description)? })
                })
                .collect(),
            public_profile: self.public_profile,
            chatbot_enabled: self.chatbot_enabled,
            booking_enabled: self.booking_enabled,
            check_in_time: clean_optional(self.check_in_time),
            check_out_time: clean_optional(self.check_out_time),
        };

        if out.name.is_empty() {
            return Err(HotelError::Validation("name is required".into()));
        }
        if strictness == Strictness::Profile {
            let required = [
                ("description", &out.description),
                ("email", &out.email),
                ("phone", &out.phone),
                ("address", &out.address),
                ("city", &out.city),
                ("country", &out.country),
                ("postal_code", &out.postal_code),
            ];
            if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
                return Err(HotelError::Validation(format!("{field} is required")));
            }
        }
        if !out.email.is_empty() {
            out.email = normalize_email(&out.email).ok_or_else(|| HotelError::Validation("invalid email".into()))?;
        }
        if !(-90.0..=90.0).contains(&out.latitude) || !(-180.0..=180.0).contains(&out.longitude) {
            return Err(HotelError::Validation("coordinates out of range".into()));
        }
        for time in [&out.check_in_time, &out.check_out_time].into_iter().flatten() {
            if !is_clock_time(time) {
                return Err(HotelError::Validation(format!("invalid time '{time}': expected HH:MM")));
            }
        }
        Ok(out)
    }
}

fn is_clock_time(raw: &str) -> bool {
    time::Time::parse(raw, time::macros::format_description!("[hour]:[minute]")).is_ok()
}

// =============================================================================
// QUERIES
// =============================================================================

/// Resolve the hotel owned by `user_id`, returning its id and name.
///
/// # Errors
///
/// Returns `NoHotel` if the user has not onboarded yet.
pub async fn owned_hotel(pool: &PgPool, user_id: Uuid) -> Result<(Uuid, String), HotelError> {
    sqlx::query_as::<_, (Uuid, String)>("SELECT id, name FROM hotels WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(HotelError::NoHotel)
}

/// Fetch a hotel by id.
///
/// # Errors
///
/// Returns `NotFound` when absent.
pub async fn get_hotel(pool: &PgPool, hotel_id: Uuid) -> Result<Hotel, HotelError> {
    sqlx::query_as::<_, Hotel>(&format!("SELECT {HOTEL_COLUMNS} FROM hotels WHERE id = $1"))
        .bind(hotel_id)
        .fetch_optional(pool)
        .await?
        .ok_or(HotelError::NotFound(hotel_id))
}

/// Fetch a hotel only if its public profile is switched on.
///
/// # Errors
///
/// Returns `NotFound` for unknown or unpublished hotels alike.
pub async fn get_public_hotel(pool: &PgPool, hotel_id: Uuid) -> Result<Hotel, HotelError> {
    sqlx::query_as::<_, Hotel>(&format!(
        "SELECT {HOTEL_COLUMNS} FROM hotels WHERE id = $1 AND public_profile"
    ))
    .bind(hotel_id)
    .fetch_optional(pool)
    .await?
    .ok_or(HotelError::NotFound(hotel_id))
}

/// Create the caller's hotel during onboarding.
///
/// # Errors
///
/// Returns `AlreadyExists` if the user already owns one.
pub async fn create_hotel(pool: &PgPool, user_id: Uuid, input: HotelInput) -> Result<Hotel, HotelError> {
    let input = input.normalize(Strictness::Onboarding)?;
    let row = bind_input(
        sqlx::query_as::<_, Hotel>(&format!(
            "INSERT INTO hotels (user_id, name, description, email, phone, website, address, city, country,
                 postal_code, latitude, longitude, logo_url, cover_url, gallery_urls, features, amenities,
                 services, public_profile, chatbot_enabled, booking_enabled, check_in_time, check_out_time)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19,
                 $20, $21, COALESCE($22, '15:00'), COALESCE($23, '11:00'))
             ON CONFLICT (user_id) DO NOTHING
             RETURNING {HOTEL_COLUMNS}"
        ))
        .bind(user_id),
        &input,
    )
    .fetch_optional(pool)
    .await?;

    let hotel = row.ok_or(HotelError::AlreadyExists)?;
    tracing::info!(hotel_id = %hotel.id, %user_id, "hotel created");
    Ok(hotel)
}

/// Replace the editable fields of a hotel.
///
/// # Errors
///
/// Returns `Validation` for bad input, `NotFound` if the row vanished.
pub async fn update_hotel(pool: &PgPool, hotel_id: Uuid, input: HotelInput) -> Result<Hotel, HotelError> {
    let input = input.normalize(Strictness::Profile)?;
    bind_input(
        sqlx::query_as::<_, Hotel>(&format!(
            "UPDATE hotels SET name = $2, description = $3, email = $4, phone = $5, website = $6,
                 address = $7, city = $8, country = $9, postal_code = $10, latitude = $11, longitude = $12,
                 logo_url = $13, cover_url = $14, gallery_urls = $15, features = $16, amenities = $17,
                 services = $18, public_profile = $19, chatbot_enabled = $20, booking_enabled = $21,
                 check_in_time = COALESCE($22, check_in_time), check_out_time = COALESCE($23, check_out_time),
                 updated_at = now()
             WHERE id = $1
             RETURNING {HOTEL_COLUMNS}"
        ))
        .bind(hotel_id),
        &input,
    )
    .fetch_optional(pool)
    .await?
    .ok_or(HotelError::NotFound(hotel_id))
}

/// Set the logo and/or cover image; `None` leaves the current value.
///
/// # Errors
///
/// Returns `NotFound` if the hotel vanished.
pub async fn set_media(
    pool: &PgPool,
    hotel_id: Uuid,
    logo_url: Option<String>,
    cover_url: Option<String>,
) -> Result<Hotel, HotelError> {
    sqlx::query_as::<_, Hotel>(&format!(
        "UPDATE hotels SET logo_url = COALESCE($2, logo_url), cover_url = COALESCE($3, cover_url),
             updated_at = now()
         WHERE id = $1
         RETURNING {HOTEL_COLUMNS}"
    ))
    .bind(hotel_id)
    .bind(clean_optional(logo_url))
    .bind(clean_optional(cover_url))
    .fetch_optional(pool)
    .await?
    .ok_or(HotelError::NotFound(hotel_id))
}

type HotelQuery<'q> = sqlx::query::QueryAs<'q, sqlx::Postgres, Hotel, sqlx::postgres::PgArguments>;

/// Bind `$2..=$23` in the column order shared by insert and update.
fn bind_input<'q>(query: HotelQuery<'q>, input: &HotelInput) -> HotelQuery<'q> {
    query
        .bind(input.name.clone())
        .bind(input.description.clone())
        .bind(input.email.clone())
        .bind(input.phone.clone())
        .bind(input.website.clone())
        .bind(input.address.clone())
        .bind(input.city.clone())
        .bind(input.country.clone())
        .bind(input.postal_code.clone())
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.logo_url.clone())
        .bind(input.cover_url.clone())
        .bind(input.gallery_urls.clone())
        .bind(input.features.clone())
        .bind(input.amenities.clone())
        .bind(sqlx::types::Json(input.services.clone()))
        .bind(input.public_profile)
        .bind(input.chatbot_enabled)
        .bind(input.booking_enabled)
        .bind(input.check_in_time.clone())
        .bind(input.check_out_time.clone())
}

#[cfg(test)]
#[path = "hotel_test.rs"]
mod tests;
