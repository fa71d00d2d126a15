use axum::Router;

pub mod subscriptions;
pub mod system;

/// Router for all API endpoints.
pub fn router() -> Router {
    Router::new().merge(subscriptions::router())
}
