//! Audit sink backed by `tracing`.

use tracing::info;

use subtrack_subscriptions::{AuditEntry, AuditSink};

/// Writes each audit entry as one structured `INFO` event on the `audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    pub fn new() -> Self {
        Self
    }
}

impl AuditSink for TracingAuditSink {
    fn record(&self, entry: AuditEntry) {
        match &entry {
            AuditEntry::Created { id } | AuditEntry::Updated { id } | AuditEntry::Deleted { id } => {
                info!(target: "audit", kind = entry.kind(), id = id.get(), "{entry}");
            }
            AuditEntry::Totalled {
                user_id,
                service_name,
                start_date,
                end_date,
                total,
            } => {
                info!(
                    target: "audit",
                    kind = entry.kind(),
                    user_id = %user_id,
                    service_name = %service_name,
                    start_date = %start_date,
                    end_date = %end_date,
                    total = *total,
                    "{entry}"
                );
            }
        }
    }
}
