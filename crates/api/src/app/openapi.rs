//! OpenAPI document and the Swagger UI that serves it.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use subtrack_subscriptions::SubscriptionView;

use crate::app::errors::ErrorBody;
use crate::app::routes::subscriptions;

pub const SWAGGER_PATH: &str = "/swagger";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "subtrack", description = "Subscription records and cost totals"),
    paths(
        subscriptions::create_subscription,
        subscriptions::list_subscriptions,
        subscriptions::total_cost,
        subscriptions::read_subscription,
        subscriptions::update_subscription,
        subscriptions::delete_subscription,
    ),
    components(schemas(SubscriptionView, ErrorBody)),
    tags((name = "subscriptions", description = "Subscription CRUD and totals"))
)]
pub struct ApiDoc;

/// Swagger UI at `/swagger/` backed by the generated document.
pub fn router() -> Router {
    SwaggerUi::new(SWAGGER_PATH)
        .url(OPENAPI_JSON_PATH, ApiDoc::openapi())
        .into()
}
