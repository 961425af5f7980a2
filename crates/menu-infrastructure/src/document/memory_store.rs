// ============================================================================
// Menu Infrastructure - In-Memory Document Store
// File: crates/menu-infrastructure/src/document/memory_store.rs
// ============================================================================

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, error};

use menu_core::error::DomainError;
use menu_core::repositories::{Document, DocumentStore};
use menu_shared::types::new_document_id;

/// Collections of JSON documents keyed by id.
///
/// Each call is atomic on its own; nothing spans calls.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
    unavailable: AtomicBool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an outage: every call fails until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    fn ensure_available(&self, op: &str) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            error!("Document store unavailable during {}", op);
            return Err(DomainError::DocumentStoreError(
                "document store unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create_id(&self, _collection: &str) -> Result<String, DomainError> {
        self.ensure_available("create_id")?;
        Ok(new_document_id())
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<(String, Document)>, DomainError> {
        self.ensure_available("get_all")?;
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DomainError> {
        self.ensure_available("get")?;
        Ok(self
            .collections
            .read()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn set(&self, collection: &str, id: &str, fields: Document) -> Result<(), DomainError> {
        self.ensure_available("set")?;
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        debug!("Document {}/{} written", collection, id);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, partial: Document) -> Result<(), DomainError> {
        self.ensure_available("update")?;
        let mut collections = self.collections.write();
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| DomainError::MenuItemNotFound(id.to_string()))?;

        for (key, value) in partial {
            document.insert(key, value);
        }
        debug!("Document {}/{} updated", collection, id);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DomainError> {
        self.ensure_available("delete")?;
        let removed = self
            .collections
            .write()
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some();
        debug!("Document {}/{} deleted (existed: {})", collection, id, removed);
        Ok(())
    }
}
