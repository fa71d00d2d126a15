//! Audit trail sink.
//!
//! Every successful mutation and every computed total is recorded here. The
//! production sink writes structured logs; tests use [`InMemoryAuditSink`].

use std::fmt;
use std::sync::Mutex;

use subtrack_core::SubscriptionId;

/// One audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEntry {
    Created {
        id: SubscriptionId,
    },
    Updated {
        id: SubscriptionId,
    },
    Deleted {
        id: SubscriptionId,
    },
    Totalled {
        user_id: String,
        service_name: String,
        start_date: String,
        end_date: String,
        total: i64,
    },
}

impl AuditEntry {
    /// Short, stable label for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created { .. } => "subscription.created",
            Self::Updated { .. } => "subscription.updated",
            Self::Deleted { .. } => "subscription.deleted",
            Self::Totalled { .. } => "subscription.totalled",
        }
    }
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { id } => write!(f, "subscription with id {id} created"),
            Self::Updated { id } => write!(f, "subscription with id {id} updated"),
            Self::Deleted { id } => write!(f, "subscription with id {id} deleted"),
            Self::Totalled {
                user_id,
                service_name,
                start_date,
                end_date,
                total,
            } => write!(
                f,
                "user: {user_id}, service: {service_name}, from: {start_date}, to: {end_date} -> {total}"
            ),
        }
    }
}

/// Destination for audit records.
pub trait AuditSink: Send + Sync + 'static {
    fn record(&self, entry: AuditEntry);
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    inner: Mutex<Vec<AuditEntry>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        match self.inner.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, entry: AuditEntry) {
        match self.inner.lock() {
            Ok(mut guard) => guard.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}
