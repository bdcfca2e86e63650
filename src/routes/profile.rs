//! Account profile and support ticket routes. These need a session but not a
//! hotel, so operators can reach them before onboarding.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use crate::error::ApiError;
use crate::routes::auth::AuthUser;
use crate::services::profile::{self, Profile, ProfileInput, SupportTicket, TicketInput};
use crate::state::AppState;

/// `GET /api/profile`
pub async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Profile>, ApiError> {
    Ok(Json(profile::get_profile(&state.pool, auth.user.id).await?))
}

/// `PUT /api/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ProfileInput>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(profile::update_profile(&state.pool, auth.user.id, body).await?))
}

/// `GET /api/support`: the caller's tickets, newest first.
pub async fn list_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SupportTicket>>, ApiError> {
    Ok(Json(profile::list_tickets(&state.pool, auth.user.id).await?))
}

/// `POST /api/support`
pub async fn create_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<TicketInput>,
) -> Result<(StatusCode, Json<SupportTicket>), ApiError> {
    let ticket = profile::create_ticket(&state.pool, auth.user.id, &body).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}
