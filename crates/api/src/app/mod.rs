//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store/audit wiring behind `AppServices`
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request extraction and validation helpers
//! - `errors.rs`: consistent error responses
//! - `openapi.rs`: OpenAPI document + Swagger UI

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod openapi;
pub mod routes;
pub mod services;

pub use services::{build_services, AppServices};

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .merge(openapi::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(services)),
        )
}
