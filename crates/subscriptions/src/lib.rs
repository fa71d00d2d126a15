//! `subtrack-subscriptions`: the subscription domain.
//!
//! - `model`: internal entity and external (wire) view
//! - `convert`: wire <-> internal mapping and the date-order check
//! - `store`: persistence port implemented by the infra adapters
//! - `audit`: observability sink port for the audit trail
//! - `service`: business rules orchestrating all of the above

pub mod audit;
pub mod convert;
pub mod model;
pub mod service;
pub mod store;

pub use audit::{AuditEntry, AuditSink, InMemoryAuditSink};
pub use model::{Subscription, SubscriptionView, TotalFilter, TotalQuery};
pub use service::{ServiceError, SubscriptionService};
pub use store::{StoreError, SubscriptionStore};
