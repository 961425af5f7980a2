//! Reconciliation log adapters

pub mod journal;
pub mod queued;

pub use journal::InMemoryReconciliationJournal;
pub use queued::QueuedReconciliationLog;
