//! Reconciliation log trait (port)

use crate::domain::OrphanRecord;

/// Sink for orphan-risk steps. Must not block the caller.
#[cfg_attr(test, mockall::automock)]
pub trait ReconciliationLog: Send + Sync {
    fn record(&self, record: OrphanRecord);
}
