use axum::http::StatusCode;

use subtrack_core::DomainError;

use crate::app::errors;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Fallback for methods a known path does not serve.
pub async fn method_not_allowed() -> axum::response::Response {
    errors::domain_error_to_response(DomainError::MethodNotAllowed)
}
