//! HTTP surface
//!
//! Maps the REST routes onto [`Telemetry`] queries.

pub mod error;
pub mod handlers;

pub use error::ApiError;

use crate::services::Telemetry;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

/// Build the application router
pub fn router(telemetry: Telemetry, cors: bool) -> Router {
    let router = Router::new()
        .route("/", get(handlers::health))
        .route("/api/v1/gpus", get(handlers::list_gpus))
        .route("/api/v1/gpus/:device_id", get(handlers::get_gpu))
        .route("/api/v1/gpus/:device_id/memory", get(handlers::get_memory))
        .route(
            "/api/v1/gpus/:device_id/utilization",
            get(handlers::get_utilization),
        )
        .with_state(telemetry);

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
