//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One JSON API for the operator dashboard and the public hotel pages. Every
//! dashboard route resolves the caller's hotel through `HotelOwner`; the
//! `/api/public` routes take the hotel id from the path.

pub mod auth;
pub mod connections;
pub mod gallery;
pub mod hotel;
pub mod profile;
pub mod public;
pub mod reservations;
pub mod reviews;
pub mod rooms;
pub mod upload;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, patch, post, put};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/dashboard", get(hotel::dashboard))
        .route(
            "/api/hotel",
            get(hotel::get_hotel).post(hotel::create_hotel).put(hotel::update_hotel),
        )
        .route("/api/hotel/media", patch(hotel::update_media))
        .route("/api/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route("/api/rooms/available", get(rooms::list_available_rooms))
        .route("/api/rooms/{id}", put(rooms::update_room).delete(rooms::delete_room))
        .route(
            "/api/room-types",
            get(rooms::list_room_types).post(rooms::create_room_type),
        )
        .route(
            "/api/room-types/{id}",
            put(rooms::update_room_type).delete(rooms::delete_room_type),
        )
        .route(
            "/api/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route("/api/reservations/calendar", get(reservations::calendar))
        .route(
            "/api/reservations/{id}",
            get(reservations::get_reservation)
                .put(reservations::update_reservation)
                .delete(reservations::delete_reservation),
        )
        .route("/api/reviews", get(reviews::list_reviews))
        .route("/api/reviews/{id}/status", patch(reviews::set_status))
        .route("/api/reviews/{id}/reply", post(reviews::reply))
        .route(
            "/api/connections",
            get(connections::list_connections).post(connections::configure),
        )
        .route("/api/connections/{id}/toggle", post(connections::toggle))
        .route("/api/gallery", get(gallery::list_images).post(gallery::add_images))
        .route("/api/gallery/{id}", axum::routing::delete(gallery::delete_image))
        .route("/api/profile", get(profile::get_profile).put(profile::update_profile))
        .route("/api/support", get(profile::list_tickets).post(profile::create_ticket))
        .route("/api/public/hotels/{id}", get(public::hotel_page))
        .route("/api/public/hotels/{id}/room-types", get(public::room_types))
        .route("/api/public/hotels/{id}/availability", post(public::availability))
        .route("/api/public/hotels/{id}/bookings", post(public::book))
        .route("/api/public/hotels/{id}/chat", post(public::chat))
        .route(
            "/api/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(upload::MAX_UPLOAD_BYTES)),
        )
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
