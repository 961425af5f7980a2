//! # Menu Infrastructure
//!
//! Store, auth and reconciliation adapters for the core ports.

pub mod auth;
pub mod document;
pub mod reconciliation;
pub mod storage;

pub use auth::InMemoryAuthProvider;
pub use document::InMemoryDocumentStore;
pub use reconciliation::{InMemoryReconciliationJournal, QueuedReconciliationLog};
pub use storage::{InMemoryObjectStore, ObjectStoreSettings};

#[cfg(test)]
mod test;
