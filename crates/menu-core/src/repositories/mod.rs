//! Repository traits (ports)

pub mod auth_provider;
pub mod document_store;
pub mod object_store;
pub mod reconciliation_log;

pub use auth_provider::AuthProvider;
pub use document_store::{Document, DocumentStore};
pub use object_store::{ObjectStore, ProgressReporter, StoredObject, UploadProgress};
pub use reconciliation_log::ReconciliationLog;
