//! Subscription service: the single authority for business rules.
//!
//! Every mutation path goes through here. The service keeps no state between
//! calls; it converts, validates, delegates to the store and records the audit
//! trail on success.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

use subtrack_core::{DomainError, SubscriptionId};

use crate::audit::{AuditEntry, AuditSink};
use crate::convert::{ensure_ordered, to_external, to_filter, to_internal};
use crate::model::{SubscriptionView, TotalQuery};
use crate::store::{StoreError, SubscriptionStore};

/// Error surfaced by [`SubscriptionService`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(DomainError::NotFound))
    }
}

pub struct SubscriptionService<S> {
    store: S,
    audit: Arc<dyn AuditSink>,
}

impl<S> SubscriptionService<S>
where
    S: SubscriptionStore,
{
    pub fn new(store: S, audit: Arc<dyn AuditSink>) -> Self {
        Self { store, audit }
    }

    /// Validate and persist a new subscription, returning the store-assigned id.
    ///
    /// An inverted date range is rejected before the store is touched.
    #[instrument(skip(self, view), fields(service_name = %view.service_name, user_id = %view.user_id), err)]
    pub async fn create(&self, view: &SubscriptionView) -> Result<SubscriptionId, ServiceError> {
        let subscription = to_internal(view)?;
        ensure_ordered(subscription.start_date, subscription.end_date)?;

        let id = self.store.create(&subscription).await?;
        self.audit.record(AuditEntry::Created { id });
        Ok(id)
    }

    #[instrument(skip(self), err)]
    pub async fn read(&self, id: SubscriptionId) -> Result<SubscriptionView, ServiceError> {
        let subscription = self.store.read(id).await.map_err(not_found_on(StoreError::NotFound))?;
        Ok(to_external(&subscription))
    }

    /// Full replace. The path id wins over any id carried in the body.
    #[instrument(skip(self, view), err)]
    pub async fn update(&self, id: SubscriptionId, view: &SubscriptionView) -> Result<(), ServiceError> {
        let mut subscription = to_internal(view)?;
        ensure_ordered(subscription.start_date, subscription.end_date)?;
        subscription.id = id;

        self.store
            .update(&subscription)
            .await
            .map_err(not_found_on(StoreError::NoRowsAffected))?;
        self.audit.record(AuditEntry::Updated { id });
        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: SubscriptionId) -> Result<(), ServiceError> {
        self.store
            .delete(id)
            .await
            .map_err(not_found_on(StoreError::NoRowsAffected))?;
        self.audit.record(AuditEntry::Deleted { id });
        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn list(&self) -> Result<Vec<SubscriptionView>, ServiceError> {
        let rows = self.store.list().await?;
        debug!(count = rows.len(), "subscriptions listed");
        Ok(rows.iter().map(to_external).collect())
    }

    /// Summed price for a user + service over an inclusive month window.
    ///
    /// An empty group is a zero total, not an error.
    #[instrument(skip(self, query), fields(user_id = %query.user_id, service_name = %query.service_name), err)]
    pub async fn total(&self, query: &TotalQuery) -> Result<i64, ServiceError> {
        let filter = to_filter(query)?;
        ensure_ordered(filter.start, Some(filter.end))?;

        let total = match self.store.aggregate(&filter).await {
            Ok(total) => total,
            Err(StoreError::NotFound) => 0,
            Err(e) => return Err(e.into()),
        };

        self.audit.record(AuditEntry::Totalled {
            user_id: query.user_id.clone(),
            service_name: query.service_name.clone(),
            start_date: query.start_date.clone(),
            end_date: query.end_date.clone(),
            total,
        });
        Ok(total)
    }
}

/// Translate one specific store condition into `DomainError::NotFound`.
fn not_found_on(condition: StoreError) -> impl FnOnce(StoreError) -> ServiceError {
    move |err| {
        if err == condition {
            ServiceError::Domain(DomainError::NotFound)
        } else {
            ServiceError::Store(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use proptest::prelude::*;

    use crate::audit::InMemoryAuditSink;
    use crate::model::{Subscription, TotalFilter};

    /// Minimal store double that counts calls, so tests can assert the store
    /// was never reached.
    #[derive(Default)]
    struct FakeStore {
        rows: Mutex<BTreeMap<i64, Subscription>>,
        next_id: AtomicUsize,
        calls: AtomicUsize,
        fail_with: Mutex<Option<StoreError>>,
    }

    impl FakeStore {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn touch(&self) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail_with.lock().unwrap().clone() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl SubscriptionStore for FakeStore {
        async fn create(&self, subscription: &Subscription) -> Result<SubscriptionId, StoreError> {
            self.touch()?;
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
            let mut row = subscription.clone();
            row.id = SubscriptionId::new(id);
            self.rows.lock().unwrap().insert(id, row);
            Ok(SubscriptionId::new(id))
        }

        async fn read(&self, id: SubscriptionId) -> Result<Subscription, StoreError> {
            self.touch()?;
            self.rows.lock().unwrap().get(&id.get()).cloned().ok_or(StoreError::NotFound)
        }

        async fn update(&self, subscription: &Subscription) -> Result<(), StoreError> {
            self.touch()?;
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(&subscription.id.get()) {
                Some(row) => {
                    *row = subscription.clone();
                    Ok(())
                }
                None => Err(StoreError::NoRowsAffected),
            }
        }

        async fn delete(&self, id: SubscriptionId) -> Result<(), StoreError> {
            self.touch()?;
            self.rows
                .lock()
                .unwrap()
                .remove(&id.get())
                .map(|_| ())
                .ok_or(StoreError::NoRowsAffected)
        }

        async fn list(&self) -> Result<Vec<Subscription>, StoreError> {
            self.touch()?;
            Ok(self.rows.lock().unwrap().values().cloned().collect())
        }

        async fn aggregate(&self, filter: &TotalFilter) -> Result<i64, StoreError> {
            self.touch()?;
            let rows = self.rows.lock().unwrap();
            let prices: Vec<i64> = rows
                .values()
                .filter(|s| s.user_id == filter.user_id && s.service_name == filter.service_name)
                .filter(|s| s.start_date >= filter.start && s.start_date <= filter.end)
                .map(|s| s.price)
                .collect();
            if prices.is_empty() {
                return Err(StoreError::NotFound);
            }
            prices
                .into_iter()
                .try_fold(0i64, |acc, price| acc.checked_add(price))
                .ok_or_else(|| StoreError::backend("total overflows i64"))
        }
    }

    fn setup() -> (SubscriptionService<Arc<FakeStore>>, Arc<FakeStore>, Arc<InMemoryAuditSink>) {
        let store = Arc::new(FakeStore::default());
        let audit = Arc::new(InMemoryAuditSink::new());
        let service = SubscriptionService::new(store.clone(), audit.clone());
        (service, store, audit)
    }

    fn netflix() -> SubscriptionView {
        SubscriptionView {
            id: 0,
            service_name: "netflix".into(),
            price: 999,
            user_id: "u1".into(),
            start_date: "01-2024".into(),
            end_date: String::new(),
        }
    }

    fn netflix_query(start: &str, end: &str) -> TotalQuery {
        TotalQuery {
            user_id: "u1".into(),
            service_name: "netflix".into(),
            start_date: start.into(),
            end_date: end.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_id_and_read_round_trips() {
        let (service, _store, audit) = setup();

        let id = service.create(&netflix()).await.unwrap();
        let view = service.read(id).await.unwrap();

        assert_eq!(view, SubscriptionView { id: id.get(), ..netflix() });
        assert_eq!(view.end_date, "");
        assert_eq!(audit.entries(), vec![AuditEntry::Created { id }]);
    }

    #[tokio::test]
    async fn create_with_inverted_range_never_reaches_store() {
        let (service, store, audit) = setup();
        let view = SubscriptionView {
            start_date: "06-2024".into(),
            end_date: "01-2024".into(),
            ..netflix()
        };

        let err = service.create(&view).await.unwrap_err();

        assert_eq!(err, ServiceError::Domain(DomainError::InvalidDateRange));
        assert_eq!(store.calls(), 0);
        assert!(audit.entries().is_empty());
    }

    #[tokio::test]
    async fn create_with_bad_date_is_parse_error() {
        let (service, store, _audit) = setup();
        let view = SubscriptionView {
            start_date: "1-2024".into(),
            ..netflix()
        };

        let err = service.create(&view).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Parse(_))));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn store_errors_propagate_unchanged() {
        let (service, store, audit) = setup();
        *store.fail_with.lock().unwrap() = Some(StoreError::backend("connection refused"));

        let err = service.create(&netflix()).await.unwrap_err();
        assert_eq!(err, ServiceError::Store(StoreError::backend("connection refused")));

        let err = service.total(&netflix_query("01-2024", "12-2024")).await.unwrap_err();
        assert_eq!(err, ServiceError::Store(StoreError::backend("connection refused")));
        assert!(audit.entries().is_empty());
    }

    #[tokio::test]
    async fn read_missing_is_not_found() {
        let (service, _store, _audit) = setup();
        let err = service.read(SubscriptionId::new(404)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_uses_path_id_and_replaces_row() {
        let (service, _store, audit) = setup();
        let id = service.create(&netflix()).await.unwrap();

        let replacement = SubscriptionView {
            id: 9999,
            price: 1299,
            end_date: "12-2024".into(),
            ..netflix()
        };
        service.update(id, &replacement).await.unwrap();

        let view = service.read(id).await.unwrap();
        assert_eq!(view.id, id.get());
        assert_eq!(view.price, 1299);
        assert_eq!(view.end_date, "12-2024");
        assert_eq!(
            audit.entries(),
            vec![AuditEntry::Created { id }, AuditEntry::Updated { id }]
        );
    }

    #[tokio::test]
    async fn update_with_inverted_range_never_reaches_store() {
        let (service, store, _audit) = setup();
        let id = service.create(&netflix()).await.unwrap();
        let before = store.calls();

        let view = SubscriptionView {
            start_date: "06-2024".into(),
            end_date: "01-2024".into(),
            ..netflix()
        };
        let err = service.update(id, &view).await.unwrap_err();

        assert_eq!(err, ServiceError::Domain(DomainError::InvalidDateRange));
        assert_eq!(store.calls(), before);
    }

    #[tokio::test]
    async fn update_and_delete_of_unknown_id_are_not_found() {
        let (service, _store, audit) = setup();
        let ghost = SubscriptionId::new(77);

        assert!(service.update(ghost, &netflix()).await.unwrap_err().is_not_found());
        assert!(service.delete(ghost).await.unwrap_err().is_not_found());
        assert!(service.list().await.unwrap().iter().all(|v| v.id != ghost.get()));
        assert!(audit.entries().is_empty());
    }

    #[tokio::test]
    async fn delete_twice_second_is_not_found() {
        let (service, _store, audit) = setup();
        let id = service.create(&netflix()).await.unwrap();

        service.delete(id).await.unwrap();
        let err = service.delete(id).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(
            audit.entries(),
            vec![AuditEntry::Created { id }, AuditEntry::Deleted { id }]
        );
    }

    #[tokio::test]
    async fn list_is_empty_not_error() {
        let (service, _store, _audit) = setup();
        assert_eq!(service.list().await.unwrap(), Vec::<SubscriptionView>::new());
    }

    #[tokio::test]
    async fn total_sums_matching_rows_and_records_result() {
        let (service, _store, audit) = setup();
        service.create(&netflix()).await.unwrap();

        let total = service.total(&netflix_query("01-2024", "12-2024")).await.unwrap();

        assert_eq!(total, 999);
        let last = audit.entries().pop().unwrap();
        assert_eq!(
            last,
            AuditEntry::Totalled {
                user_id: "u1".into(),
                service_name: "netflix".into(),
                start_date: "01-2024".into(),
                end_date: "12-2024".into(),
                total: 999,
            }
        );
    }

    #[tokio::test]
    async fn total_of_empty_group_is_zero() {
        let (service, _store, audit) = setup();
        service.create(&netflix()).await.unwrap();

        let total = service.total(&netflix_query("01-2025", "12-2025")).await.unwrap();

        assert_eq!(total, 0);
        assert!(matches!(
            audit.entries().last(),
            Some(AuditEntry::Totalled { total: 0, .. })
        ));
    }

    #[tokio::test]
    async fn total_with_inverted_range_never_reaches_store() {
        let (service, store, audit) = setup();
        let err = service.total(&netflix_query("12-2024", "01-2024")).await.unwrap_err();

        assert_eq!(err, ServiceError::Domain(DomainError::InvalidDateRange));
        assert_eq!(store.calls(), 0);
        assert!(audit.entries().is_empty());
    }

    #[tokio::test]
    async fn total_overflow_surfaces_store_error_without_audit() {
        let (service, _store, audit) = setup();
        let huge = SubscriptionView {
            price: i64::MAX,
            ..netflix()
        };
        service.create(&huge).await.unwrap();
        service.create(&huge).await.unwrap();

        let err = service.total(&netflix_query("01-2024", "12-2024")).await.unwrap_err();

        assert!(matches!(err, ServiceError::Store(StoreError::Backend(_))));
        assert_eq!(audit.entries().len(), 2);
    }

    fn month() -> impl Strategy<Value = (i32, u32)> {
        (1900i32..2100, 1u32..=12)
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: any start strictly after end is rejected by create and
        /// update without a store call.
        #[test]
        fn inverted_ranges_are_always_rejected(a in month(), b in month()) {
            prop_assume!(a != b);
            let (start, end) = if a > b { (a, b) } else { (b, a) };

            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let (service, store, _audit) = setup();
                let view = SubscriptionView {
                    start_date: format!("{:02}-{:04}", start.1, start.0),
                    end_date: format!("{:02}-{:04}", end.1, end.0),
                    ..netflix()
                };

                let create = service.create(&view).await.unwrap_err();
                let update = service.update(SubscriptionId::new(1), &view).await.unwrap_err();

                assert_eq!(create, ServiceError::Domain(DomainError::InvalidDateRange));
                assert_eq!(update, ServiceError::Domain(DomainError::InvalidDateRange));
                assert_eq!(store.calls(), 0);
            });
        }
    }
}
