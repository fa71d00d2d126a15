use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use subtrack_core::{Entity, SubscriptionId};
use subtrack_subscriptions::{StoreError, Subscription, SubscriptionStore, TotalFilter};

/// In-memory subscription store for tests/dev.
///
/// Ids are assigned from a counter starting at 1 and never reused. `list`
/// returns rows in ascending id order.
#[derive(Debug)]
pub struct InMemorySubscriptionStore {
    rows: RwLock<BTreeMap<SubscriptionId, Subscription>>,
    next_id: AtomicI64,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Row count. A poisoned lock still reports the rows it guards.
    pub fn len(&self) -> usize {
        self.rows
            .read()
            .map(|r| r.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySubscriptionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::backend("in-memory store lock poisoned")
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn create(&self, subscription: &Subscription) -> Result<SubscriptionId, StoreError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let id = SubscriptionId::new(self.next_id.fetch_add(1, Ordering::SeqCst));

        let mut row = subscription.clone();
        row.id = id;
        rows.insert(row.id(), row);
        Ok(id)
    }

    async fn read(&self, id: SubscriptionId) -> Result<Subscription, StoreError> {
        let rows = self.rows.read().map_err(poisoned)?;
        rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        match rows.get_mut(&subscription.id()) {
            Some(row) => {
                *row = subscription.clone();
                Ok(())
            }
            None => Err(StoreError::NoRowsAffected),
        }
    }

    async fn delete(&self, id: SubscriptionId) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        rows.remove(&id).map(|_| ()).ok_or(StoreError::NoRowsAffected)
    }

    async fn list(&self) -> Result<Vec<Subscription>, StoreError> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.values().cloned().collect())
    }

    async fn aggregate(&self, filter: &TotalFilter) -> Result<i64, StoreError> {
        let rows = self.rows.read().map_err(poisoned)?;

        let mut matched = rows
            .values()
            .filter(|s| s.user_id == filter.user_id && s.service_name == filter.service_name)
            .filter(|s| filter.start <= s.start_date && s.start_date <= filter.end)
            .map(|s| s.price)
            .peekable();

        // SQL SUM over an empty group yields no row; mirror that.
        if matched.peek().is_none() {
            return Err(StoreError::NotFound);
        }
        matched
            .try_fold(0i64, |acc, price| acc.checked_add(price))
            .ok_or_else(|| StoreError::backend("total overflows i64"))
    }
}
