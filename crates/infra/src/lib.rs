//! Infrastructure layer: store adapters, audit sink, config.

pub mod audit;
pub mod config;
pub mod store;


pub use audit::TracingAuditSink;
pub use config::AppConfig;
pub use store::{InMemorySubscriptionStore, PostgresSubscriptionStore};
