//! Runtime configuration parsed from environment variables.
//!
//! `.env` is loaded by `main` before any of these run, so local development
//! can keep secrets out of the shell profile.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_CHAT_REPLY_DELAY_MS: u64 = 1500;
pub const DEFAULT_UPLOAD_FOLDER: &str = "hotel_images";
pub const DEFAULT_CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub chat_reply_delay: Duration,
}

impl ServerConfig {
    /// Build the server config.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `CHAT_REPLY_DELAY_MS`: simulated assistant typing delay, default 1500
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is unset or `PORT` does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            database_url,
            port,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            chat_reply_delay: Duration::from_millis(env_parse("CHAT_REPLY_DELAY_MS", DEFAULT_CHAT_REPLY_DELAY_MS)),
        })
    }
}

/// Credentials for the media upload service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
    pub base_url: String,
}

impl CloudinaryConfig {
    /// Load from `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET`.
    /// Returns `None` if any are missing (uploads will be disabled).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let cloud_name = non_empty_var("CLOUDINARY_CLOUD_NAME")?;
        let api_key = non_empty_var("CLOUDINARY_API_KEY")?;
        let api_secret = non_empty_var("CLOUDINARY_API_SECRET")?;
        let folder = non_empty_var("CLOUDINARY_FOLDER").unwrap_or_else(|| DEFAULT_UPLOAD_FOLDER.to_owned());
        let base_url = non_empty_var("CLOUDINARY_BASE_URL")
            .unwrap_or_else(|| DEFAULT_CLOUDINARY_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        Some(Self { cloud_name, api_key, api_secret, folder, base_url })
    }

    /// Endpoint for image uploads into this cloud.
    #[must_use]
    pub fn upload_url(&self) -> String {
        format!("{}/{}/image/upload", self.base_url, self.cloud_name)
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
