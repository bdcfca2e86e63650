//! OTA connection service: channel-manager credentials per provider.
//!
//! DESIGN
//! ======
//! The provider list is a fixed catalog; the table only stores the
//! credentials an operator has entered. Listing merges the two so every
//! provider shows up, configured or not. Secrets are write-only: no read
//! path selects `api_secret`, and the key is only ever returned masked.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::validate::non_blank;

// =============================================================================
// CATALOG
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provider {
    pub name: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

pub const CATALOG: [Provider; 6] = [
    Provider {
        name: "Booking",
        color: "#003580",
        description: "Connect with Booking.com, one of the world's leading digital travel companies.",
    },
    Provider {
        name: "Trivago",
        color: "#007faf",
        description: "Integrate with Trivago, a global hotel search platform.",
    },
    Provider {
        name: "Airbnb",
        color: "#ff5a5f",
        description: "Link your property with Airbnb, the popular online marketplace for lodging and tourism experiences.",
    },
    Provider {
        name: "Expedia",
        color: "#00355f",
        description: "Connect to Expedia Group, which powers major travel booking sites.",
    },
    Provider {
        name: "Hotels.com",
        color: "#d32f2f",
        description: "Integrate with Hotels.com, a leading lodging booking platform.",
    },
    Provider {
        name: "TripAdvisor",
        color: "#00a680",
        description: "Connect with TripAdvisor, the world's largest travel guidance platform.",
    },
];

/// Look up a catalog provider by name, ignoring case and surrounding space.
#[must_use]
pub fn find_provider(name: &str) -> Option<&'static Provider> {
    let name = name.trim();
    CATALOG.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// First six characters of the key followed by `...`.
#[must_use]
pub fn mask_key(api_key: &str) -> String {
    let prefix: String = api_key.chars().take(6).collect();
    format!("{prefix}...")
}

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OtaError {
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),
    #[error("{0} is already configured")]
    AlreadyConfigured(&'static str),
    #[error("connection not found: {0}")]
    NotFound(Uuid),
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl crate::error::ErrorCode for OtaError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownProvider(_) => "E_UNKNOWN_PROVIDER",
            Self::AlreadyConfigured(_) => "E_ALREADY_CONFIGURED",
            Self::NotFound(_) => "E_CONNECTION_NOT_FOUND",
            Self::Validation(_) => "E_VALIDATION",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::UnknownProvider(_) | Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::AlreadyConfigured(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Stored connection without its secret.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StoredConnection {
    pub id: Uuid,
    pub ota_name: String,
    pub api_key: String,
    pub is_active: bool,
}

/// One card on the connections page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionView {
    pub id: Option<Uuid>,
    pub ota_name: &'static str,
    pub color: &'static str,
    pub description: &'static str,
    pub is_active: bool,
    pub is_configured: bool,
    pub masked_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConnectionInput {
    pub ota_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Merge stored rows into the catalog, in catalog order.
#[must_use]
pub fn merge_catalog(stored: &[StoredConnection]) -> Vec<ConnectionView> {
    CATALOG
        .iter()
        .map(|provider| {
            let row = stored.iter().find(|c| c.ota_name.eq_ignore_ascii_case(provider.name));
            ConnectionView {
                id: row.map(|c| c.id),
                ota_name: provider.name,
                color: provider.color,
                description: provider.description,
                is_active: row.is_some_and(|c| c.is_active),
                is_configured: row.is_some(),
                masked_key: row.map(|c| mask_key(&c.api_key)),
            }
        })
        .collect()
}

// =============================================================================
// QUERIES
// =============================================================================

async fn stored_connections(pool: &PgPool, hotel_id: Uuid) -> Result<Vec<StoredConnection>, OtaError> {
    let rows = sqlx::query_as::<_, StoredConnection>(
        "SELECT id, ota_name, api_key, is_active FROM ota_connections WHERE hotel_id = $1",
    )
    .bind(hotel_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Every catalog provider with the hotel's configuration state.
pub async fn list_connections(pool: &PgPool, hotel_id: Uuid) -> Result<Vec<ConnectionView>, OtaError> {
    Ok(merge_catalog(&stored_connections(pool, hotel_id).await?))
}

/// Store credentials for a provider. New connections start inactive.
///
/// # Errors
///
/// Returns `UnknownProvider`, `Validation` for blank credentials, or
/// `AlreadyConfigured` when the provider already has a row.
pub async fn configure(pool: &PgPool, hotel_id: Uuid, input: ConnectionInput) -> Result<ConnectionView, OtaError> {
    let provider = find_provider(&input.ota_name).ok_or_else(|| OtaError::UnknownProvider(input.ota_name.clone()))?;
    let api_key = non_blank(&input.api_key).ok_or_else(|| OtaError::Validation("api key is required".into()))?;
    let api_secret =
        non_blank(&input.api_secret).ok_or_else(|| OtaError::Validation("api secret is required".into()))?;

    let inserted = sqlx::query_as::<_, StoredConnection>(
        "INSERT INTO ota_connections (hotel_id, ota_name, api_key, api_secret)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (hotel_id, ota_name) DO NOTHING
         RETURNING id, ota_name, api_key, is_active",
    )
    .bind(hotel_id)
    .bind(provider.name)
    .bind(&api_key)
    .bind(&api_secret)
    .fetch_optional(pool)
    .await?
    .ok_or(OtaError::AlreadyConfigured(provider.name))?;

    tracing::info!(%hotel_id, provider = provider.name, "ota connection configured");
    merge_catalog(std::slice::from_ref(&inserted))
        .into_iter()
        .find(|view| view.ota_name == provider.name)
        .ok_or(OtaError::UnknownProvider(inserted.ota_name))
}

/// Flip a connection's active flag.
///
/// # Errors
///
/// Returns `NotFound` when the connection is not the hotel's.
pub async fn toggle(pool: &PgPool, hotel_id: Uuid, connection_id: Uuid) -> Result<ConnectionView, OtaError> {
    let row = sqlx::query_as::<_, StoredConnection>(
        "UPDATE ota_connections SET is_active = NOT is_active
         WHERE id = $1 AND hotel_id = $2
         RETURNING id, ota_name, api_key, is_active",
    )
    .bind(connection_id)
    .bind(hotel_id)
    .fetch_optional(pool)
    .await?
    .ok_or(OtaError::NotFound(connection_id))?;

    tracing::info!(%hotel_id, %connection_id, is_active = row.is_active, "ota connection toggled");
    merge_catalog(std::slice::from_ref(&row))
        .into_iter()
        .find(|view| view.id == Some(row.id))
        .ok_or(OtaError::NotFound(connection_id))
}

#[cfg(test)]
#[path = "ota_test.rs"]
mod tests;
