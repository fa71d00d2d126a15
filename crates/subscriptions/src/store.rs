//! Persistence port for subscriptions.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use subtrack_core::SubscriptionId;

use crate::model::{Subscription, TotalFilter};

/// Store operation error.
///
/// These are **infrastructure errors** as opposed to domain errors. The service
/// decides which of them mean "not found" for a given operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No row matched a lookup (read, or an empty aggregate group).
    #[error("no rows in result set")]
    NotFound,

    /// A write touched zero rows (unknown id, or an insert that returned no id).
    #[error("no rows affected")]
    NoRowsAffected,

    /// Anything else: connectivity, decoding, constraint failures.
    #[error("store error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Durable subscription storage.
///
/// The service depends only on this trait. Implementations must:
/// - assign ids on `create` and return them (`NoRowsAffected` if none came back)
/// - report `NotFound` from `read` when no row matches
/// - replace the full row on `update`, keyed by `subscription.id`
/// - report `NoRowsAffected` from `update`/`delete` for unknown ids
/// - report `NotFound` from `aggregate` when the matching group is empty
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn create(&self, subscription: &Subscription) -> Result<SubscriptionId, StoreError>;

    async fn read(&self, id: SubscriptionId) -> Result<Subscription, StoreError>;

    async fn update(&self, subscription: &Subscription) -> Result<(), StoreError>;

    async fn delete(&self, id: SubscriptionId) -> Result<(), StoreError>;

    /// All rows, store-default order, no pagination.
    async fn list(&self) -> Result<Vec<Subscription>, StoreError>;

    /// Sum of `price` for `user_id` + `service_name` with `start_date` in
    /// `[filter.start, filter.end]`.
    async fn aggregate(&self, filter: &TotalFilter) -> Result<i64, StoreError>;
}

#[async_trait]
impl<S> SubscriptionStore for Arc<S>
where
    S: SubscriptionStore + ?Sized,
{
    async fn create(&self, subscription: &Subscription) -> Result<SubscriptionId, StoreError> {
        (**self).create(subscription).await
    }

    async fn read(&self, id: SubscriptionId) -> Result<Subscription, StoreError> {
        (**self).read(id).await
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), StoreError> {
        (**self).update(subscription).await
    }

    async fn delete(&self, id: SubscriptionId) -> Result<(), StoreError> {
        (**self).delete(id).await
    }

    async fn list(&self) -> Result<Vec<Subscription>, StoreError> {
        (**self).list().await
    }

    async fn aggregate(&self, filter: &TotalFilter) -> Result<i64, StoreError> {
        (**self).aggregate(filter).await
    }
}
