use std::sync::Arc;

use subtrack_infra::{AppConfig, InMemorySubscriptionStore, PostgresSubscriptionStore, TracingAuditSink};
use subtrack_subscriptions::{AuditSink, SubscriptionService, SubscriptionStore};

/// Store handle the router works against, whichever adapter backs it.
pub type DynStore = Arc<dyn SubscriptionStore>;

/// Everything the handlers need, shared through an `Extension`.
pub struct AppServices {
    pub subscriptions: SubscriptionService<DynStore>,
}

impl AppServices {
    pub fn new(store: DynStore, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            subscriptions: SubscriptionService::new(store, audit),
        }
    }

    /// In-memory store with the tracing audit trail (dev/test).
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemorySubscriptionStore::new()),
            Arc::new(TracingAuditSink::new()),
        )
    }
}

/// Wire the store adapter selected by `config`.
///
/// The Postgres pool is opened and pinged here, so a bad DSN fails startup
/// instead of the first request.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    if config.use_persistent_stores {
        let store = PostgresSubscriptionStore::connect(&config.postgres_dsn).await?;
        tracing::info!("using Postgres subscription store");
        return Ok(AppServices::new(Arc::new(store), Arc::new(TracingAuditSink::new())));
    }

    tracing::info!("using in-memory subscription store");
    Ok(AppServices::in_memory())
}
