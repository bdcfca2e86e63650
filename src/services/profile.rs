//! Operator profile and support tickets.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::validate::{clean_optional, non_blank};

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile not found: {0}")]
    NotFound(Uuid),
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl crate::error::ErrorCode for ProfileError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_PROFILE_NOT_FOUND",
            Self::Validation(_) => "E_VALIDATION",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub avatar_url: Option<String>,
}

/// Editable profile fields. Email belongs to the identity platform.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileInput {
    pub full_name: String,
    pub phone: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SupportTicket {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub message: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TicketInput {
    pub subject: String,
    pub message: String,
}

impl TicketInput {
    /// Trimmed `(subject, message)`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when either is blank.
    pub fn validate(&self) -> Result<(String, String), ProfileError> {
        let subject = non_blank(&self.subject).ok_or_else(|| ProfileError::Validation("subject is required".into()))?;
        let message = non_blank(&self.message).ok_or_else(|| ProfileError::Validation("message is required".into()))?;
        Ok((subject, message))
    }
}

// =============================================================================
// PROFILE
// =============================================================================

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Profile, ProfileError> {
    sqlx::query_as::<_, Profile>("SELECT id, full_name, email, phone, avatar_url FROM profiles WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ProfileError::NotFound(user_id))
}

/// # Errors
///
/// Returns `Validation` when the full name is blank.
pub async fn update_profile(pool: &PgPool, user_id: Uuid, input: ProfileInput) -> Result<Profile, ProfileError> {
    let full_name =
        non_blank(&input.full_name).ok_or_else(|| ProfileError::Validation("full name is required".into()))?;
    sqlx::query_as::<_, Profile>(
        "UPDATE profiles SET full_name = $2, phone = $3, avatar_url = COALESCE($4, avatar_url)
         WHERE id = $1
         RETURNING id, full_name, email, phone, avatar_url",
    )
    .bind(user_id)
    .bind(full_name)
    .bind(input.phone.trim())
    .bind(clean_optional(input.avatar_url))
    .fetch_optional(pool)
    .await?
    .ok_or(ProfileError::NotFound(user_id))
}

// =============================================================================
// SUPPORT
// =============================================================================

/// Open a support ticket.
pub async fn create_ticket(pool: &PgPool, user_id: Uuid, input: &TicketInput) -> Result<SupportTicket, ProfileError> {
    let (subject, message) = input.validate()?;
    let ticket = sqlx::query_as::<_, SupportTicket>(
        "INSERT INTO support_tickets (user_id, subject, message)
         VALUES ($1, $2, $3)
         RETURNING id, user_id, subject, message, status, created_at",
    )
    .bind(user_id)
    .bind(subject)
    .bind(message)
    .fetch_one(pool)
    .await?;
    tracing::info!(%user_id, ticket_id = %ticket.id, "support ticket opened");
    Ok(ticket)
}

/// The caller's tickets, newest first.
pub async fn list_tickets(pool: &PgPool, user_id: Uuid) -> Result<Vec<SupportTicket>, ProfileError> {
    let rows = sqlx::query_as::<_, SupportTicket>(
        "SELECT id, user_id, subject, message, status, created_at
         FROM support_tickets
         WHERE user_id = $1
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
