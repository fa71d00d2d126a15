use std::sync::Arc;

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Extension, Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use subtrack_subscriptions::{SubscriptionView, TotalQuery};

use crate::app::errors::ErrorBody;
use crate::app::{dto, errors};
use crate::app::routes::system::method_not_allowed;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route(
            "/subscriptions",
            get(list_subscriptions)
                .post(create_subscription)
                .fallback(method_not_allowed),
        )
        // Static segment wins over `/:id` in the matcher.
        .route(
            "/subscriptions/total",
            get(total_cost).fallback(method_not_allowed),
        )
        .route(
            "/subscriptions/:id",
            get(read_subscription)
                .put(update_subscription)
                .delete(delete_subscription)
                .fallback(method_not_allowed),
        )
}

#[utoipa::path(
    post,
    path = "/subscriptions",
    tag = "subscriptions",
    request_body = SubscriptionView,
    responses(
        (status = 201, description = "Subscription created",
            headers(("Location" = String, description = "Path of the new subscription"))),
        (status = 400, description = "Malformed, empty or inverted-range body", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    )
)]
pub async fn create_subscription(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<SubscriptionView>, JsonRejection>,
) -> axum::response::Response {
    let view = match dto::subscription_body(body) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.subscriptions.create(&view).await {
        Ok(id) => (
            StatusCode::CREATED,
            [(header::LOCATION, format!("/subscriptions/{id}"))],
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions",
    tag = "subscriptions",
    responses(
        (status = 200, description = "All subscriptions", body = [SubscriptionView]),
        (status = 500, description = "Store failure", body = ErrorBody),
    )
)]
pub async fn list_subscriptions(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.subscriptions.list().await {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = i64, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "The subscription", body = SubscriptionView),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "No such subscription", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    )
)]
pub async fn read_subscription(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.subscriptions.read(id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

#[utoipa::path(
    put,
    path = "/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = i64, Path, description = "Subscription id")),
    request_body = SubscriptionView,
    responses(
        (status = 204, description = "Subscription replaced"),
        (status = 400, description = "Invalid id or body", body = ErrorBody),
        (status = 404, description = "No such subscription", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    )
)]
pub async fn update_subscription(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<SubscriptionView>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let view = match dto::subscription_body(body) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.subscriptions.update(id, &view).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = i64, Path, description = "Subscription id")),
    responses(
        (status = 204, description = "Subscription deleted"),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "No such subscription", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    )
)]
pub async fn delete_subscription(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.subscriptions.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Summed price of one user's subscriptions to one service, by start month.
#[utoipa::path(
    get,
    path = "/subscriptions/total",
    tag = "subscriptions",
    params(TotalQuery),
    responses(
        (status = 200, description = "Total price over the window", body = i64),
        (status = 400, description = "Missing, malformed or inverted query parameters", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    )
)]
pub async fn total_cost(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<TotalQuery>, QueryRejection>,
) -> axum::response::Response {
    let query = match dto::total_query(query) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.subscriptions.total(&query).await {
        Ok(total) => (StatusCode::OK, Json(total)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
