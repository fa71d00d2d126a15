use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use utoipa::ToSchema;

use subtrack_core::DomainError;
use subtrack_subscriptions::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let (status, code) = match &err {
        DomainError::Parse(_) => (StatusCode::BAD_REQUEST, "parse_error"),
        DomainError::InvalidDateRange => (StatusCode::BAD_REQUEST, "invalid_date_range"),
        DomainError::EmptyRequest(_) => (StatusCode::BAD_REQUEST, "empty_request"),
        DomainError::InvalidId(_) => (StatusCode::BAD_REQUEST, "invalid_id"),
        DomainError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        DomainError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed"),
    };
    tracing::warn!(status = status.as_u16(), error = %err, "request rejected");
    json_error(status, code, err.to_string())
}

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "invalid_date_range")]
    pub error: &'static str,
    #[schema(example = "start date is later than end date")]
    pub message: String,
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(ErrorBody {
            error: code,
            message: message.into(),
        }),
    )
        .into_response()
}
