use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub mod config;
pub mod decode;
pub mod error;
pub mod handlers;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

pub fn create_app(state: AppState, config: &ServerConfig) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::root))
        .route("/detect-emotion", post(handlers::detect_emotion))
        .route("/detect-emotion-base64", post(handlers::detect_emotion_base64))
        .route("/health", get(handlers::health))
        .route("/model-info", get(handlers::model_info))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Bind `config.bind_addr()` and serve until Ctrl-C.
pub async fn serve(state: AppState, config: ServerConfig) -> anyhow::Result<()> {
    let app = create_app(state, &config);
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(
        addr = %listener.local_addr()?,
        static_dir = %config.static_dir.display(),
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

pub mod prelude {
    pub use crate::{create_app, serve, ApiError, AppState, ServerConfig};
    pub use mood_core::{Error, LabeledScore, Result};
}
