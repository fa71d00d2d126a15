//! Request extraction helpers shared by the handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query};

use subtrack_core::{DomainError, SubscriptionId};
use subtrack_subscriptions::{SubscriptionView, TotalQuery};

/// Parse the `{id}` path segment.
pub fn parse_id(raw: &str) -> Result<SubscriptionId, DomainError> {
    raw.parse()
}

/// Unwrap a JSON body, rejecting malformed payloads and the all-default view.
pub fn subscription_body(
    body: Result<Json<SubscriptionView>, JsonRejection>,
) -> Result<SubscriptionView, DomainError> {
    let Json(view) = body.map_err(|e| DomainError::parse(e.body_text()))?;
    if view.is_empty() {
        return Err(DomainError::empty_request("subscription body carries no fields"));
    }
    Ok(view)
}

/// Unwrap the total query string, requiring all four parameters.
pub fn total_query(
    query: Result<Query<TotalQuery>, QueryRejection>,
) -> Result<TotalQuery, DomainError> {
    let Query(query) = query.map_err(|e| DomainError::parse(e.body_text()))?;
    let missing = query.missing_params();
    if !missing.is_empty() {
        return Err(DomainError::empty_request(format!(
            "missing query parameters: {}",
            missing.join(", ")
        )));
    }
    Ok(query)
}
