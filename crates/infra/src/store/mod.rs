//! Subscription store adapters.
//!
//! - `InMemorySubscriptionStore`: tests/dev
//! - `PostgresSubscriptionStore`: production (sqlx connection pool)

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemorySubscriptionStore;
pub use postgres::PostgresSubscriptionStore;
