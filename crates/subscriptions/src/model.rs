//! Subscription entity and its wire representation.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use subtrack_core::{Entity, MonthYear, SubscriptionId};

/// Canonical stored subscription (typed dates).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub service_name: String,
    /// Minor currency units. Sign is not enforced.
    pub price: i64,
    /// Opaque external user identifier.
    pub user_id: String,
    pub start_date: MonthYear,
    /// `None` means the subscription is still active.
    pub end_date: Option<MonthYear>,
}

impl Entity for Subscription {
    type Id = SubscriptionId;

    fn id(&self) -> SubscriptionId {
        self.id
    }
}

/// Wire representation exchanged with API clients.
///
/// Dates are `MM-YYYY` strings; an absent end date is the empty string. Every
/// field defaults so that partial JSON objects decode and can be checked with
/// [`SubscriptionView::is_empty`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SubscriptionView {
    /// Ignored on create and update.
    pub id: i64,
    #[schema(example = "netflix")]
    pub service_name: String,
    #[schema(example = 999)]
    pub price: i64,
    #[schema(example = "u1")]
    pub user_id: String,
    #[schema(example = "01-2024")]
    pub start_date: String,
    /// Empty while the subscription is active.
    #[schema(example = "")]
    pub end_date: String,
}

impl SubscriptionView {
    /// True when the view carries nothing but defaults (a no-op request body).
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Wire form of the aggregate cost query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct TotalQuery {
    #[param(required = true, example = "u1")]
    pub user_id: String,
    #[param(required = true, example = "netflix")]
    pub service_name: String,
    /// First month of the window, `MM-YYYY`, inclusive.
    #[param(required = true, example = "01-2024")]
    pub start_date: String,
    /// Last month of the window, `MM-YYYY`, inclusive.
    #[param(required = true, example = "12-2024")]
    pub end_date: String,
}

impl TotalQuery {
    /// Names of the parameters that are missing or blank.
    pub fn missing_params(&self) -> Vec<&'static str> {
        [
            ("user_id", &self.user_id),
            ("service_name", &self.service_name),
            ("start_date", &self.start_date),
            ("end_date", &self.end_date),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect()
    }
}

/// Parsed aggregate query handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalFilter {
    pub user_id: String,
    pub service_name: String,
    /// Inclusive lower bound on `start_date`.
    pub start: MonthYear,
    /// Inclusive upper bound on `start_date`.
    pub end: MonthYear,
}
