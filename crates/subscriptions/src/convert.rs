//! Wire <-> internal mapping.
//!
//! Lossless within month granularity: `to_external(&to_internal(v)?) == v` for
//! every view whose dates are valid `MM-YYYY` strings.

use subtrack_core::{DomainError, DomainResult, MonthYear, SubscriptionId};

use crate::model::{Subscription, SubscriptionView, TotalFilter, TotalQuery};

/// Parse a wire view into the internal entity.
///
/// The id is copied as given; callers that own the id (update) overwrite it.
pub fn to_internal(view: &SubscriptionView) -> DomainResult<Subscription> {
    Ok(Subscription {
        id: SubscriptionId::new(view.id),
        service_name: view.service_name.clone(),
        price: view.price,
        user_id: view.user_id.clone(),
        start_date: MonthYear::parse(&view.start_date)?,
        end_date: parse_optional(&view.end_date)?,
    })
}

/// Format the internal entity for the wire. Cannot fail.
pub fn to_external(subscription: &Subscription) -> SubscriptionView {
    SubscriptionView {
        id: subscription.id.get(),
        service_name: subscription.service_name.clone(),
        price: subscription.price,
        user_id: subscription.user_id.clone(),
        start_date: subscription.start_date.to_string(),
        end_date: subscription
            .end_date
            .map(|d| d.to_string())
            .unwrap_or_default(),
    }
}

/// Parse the aggregate query bounds with the same `MM-YYYY` rules.
pub fn to_filter(query: &TotalQuery) -> DomainResult<TotalFilter> {
    Ok(TotalFilter {
        user_id: query.user_id.clone(),
        service_name: query.service_name.clone(),
        start: MonthYear::parse(&query.start_date)?,
        end: MonthYear::parse(&query.end_date)?,
    })
}

/// `start <= end` at month granularity whenever an end is present.
pub fn ensure_ordered(start: MonthYear, end: Option<MonthYear>) -> DomainResult<()> {
    match end {
        Some(end) if start > end => Err(DomainError::InvalidDateRange),
        _ => Ok(()),
    }
}

fn parse_optional(raw: &str) -> DomainResult<Option<MonthYear>> {
    if raw.is_empty() {
        return Ok(None);
    }
    MonthYear::parse(raw).map(Some)
}
