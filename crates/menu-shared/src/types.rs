//! Common types

use uuid::Uuid;

/// Opaque document identifier handed out by the document store.
pub type DocumentId = String;

pub fn new_document_id() -> DocumentId {
    Uuid::new_v4().simple().to_string()
}
