//! HTTP transport of the service façade.
//!
//! Routes:
//!
//! | Method | Path                      | Handler                    |
//! |--------|---------------------------|----------------------------|
//! | POST   | `/api/seating/preview`    | [`handlers::preview`]      |
//! | POST   | `/api/seating/generate`   | [`handlers::generate`]     |
//! | GET    | `/api/status`             | [`handlers::status`]       |
//! | GET    | `/assets/templates/:file` | [`handlers::template`]     |

pub mod config;
pub mod error;
pub mod handlers;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{self, HeaderName};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ApiError;

/// Build the application router with its middleware stack.
pub fn build_router(config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/api/seating/preview", post(handlers::preview))
        .route("/api/seating/generate", post(handlers::generate))
        .route("/api/status", get(handlers::status))
        .route("/assets/templates/:file", get(handlers::template))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http());

    if !config.cors {
        return router;
    }
    router.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([
                header::CONTENT_DISPOSITION,
                HeaderName::from_static(handlers::UNASSIGNED_COUNT_HEADER),
                HeaderName::from_static(handlers::WARNING_COUNT_HEADER),
                HeaderName::from_static(handlers::ROW_ERROR_COUNT_HEADER),
            ]),
    )
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received Ctrl+C, shutting down"),
        Err(e) => tracing::error!("failed to listen for Ctrl+C signal: {e}"),
    }
}

/// Bind and serve until Ctrl+C.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        timeout_secs = config.request_timeout.as_secs(),
        max_upload_bytes = config.max_upload_bytes,
        cors = config.cors,
        "seatplan server listening"
    );
    axum::serve(listener, build_router(&config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("seatplan server stopped");
    Ok(())
}
