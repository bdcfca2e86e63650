mod config;
mod dates;
mod db;
mod error;
mod rate_limit;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{CloudinaryConfig, ServerConfig};
use crate::services::upload::{CloudinaryUploader, MediaUploader};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hotelier=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env().expect("invalid server configuration");

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    let uploader: Option<Arc<dyn MediaUploader>> = match CloudinaryConfig::from_env() {
        Some(cloudinary) => {
            let uploader = CloudinaryUploader::new(cloudinary).expect("upload client init failed");
            Some(Arc::new(uploader))
        }
        None => {
            tracing::warn!("cloudinary not configured; /api/upload disabled");
            None
        }
    };

    let state = state::AppState::new(pool, config.chat_reply_delay, uploader);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "hotelier listening");
    axum::serve(listener, app).await.expect("server failed");
}
