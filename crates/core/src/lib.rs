//! `subtrack-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the month-granularity calendar type and the error taxonomy.

pub mod entity;
pub mod error;
pub mod id;
pub mod month;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::SubscriptionId;
pub use month::MonthYear;
