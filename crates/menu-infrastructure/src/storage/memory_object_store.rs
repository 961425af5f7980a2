// ============================================================================
// Menu Infrastructure - In-Memory Object Store
// File: crates/menu-infrastructure/src/storage/memory_object_store.rs
// ============================================================================

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tracing::{debug, info, warn};

use menu_core::error::DomainError;
use menu_core::repositories::{ObjectStore, ProgressReporter, StoredObject, UploadProgress};
use menu_shared::constants::DEFAULT_UPLOAD_CHUNK_BYTES;

#[derive(Debug, Clone)]
pub struct ObjectStoreSettings {
    /// Bytes written per progress tick
    pub chunk_bytes: usize,
    /// Prefix of download URLs, e.g. `http://127.0.0.1:8080/media`
    pub public_base_url: String,
}

impl Default for ObjectStoreSettings {
    fn default() -> Self {
        Self {
            chunk_bytes: DEFAULT_UPLOAD_CHUNK_BYTES,
            public_base_url: "http://127.0.0.1:8080/media".to_string(),
        }
    }
}

/// Path-addressed binary storage with chunked uploads.
pub struct InMemoryObjectStore {
    objects: DashMap<String, Bytes>,
    settings: ObjectStoreSettings,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
}

impl InMemoryObjectStore {
    pub fn new(settings: ObjectStoreSettings) -> Self {
        Self {
            objects: DashMap::new(),
            settings: ObjectStoreSettings {
                chunk_bytes: settings.chunk_bytes.max(1),
                ..settings
            },
            fail_uploads: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.objects.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Bytes,
        progress: ProgressReporter,
    ) -> Result<StoredObject, DomainError> {
        let total = bytes.len();
        let chunk = self.settings.chunk_bytes;
        let mut transferred = 0;

        while transferred < total {
            if self.fail_uploads.load(Ordering::SeqCst) {
                warn!("Upload of {} interrupted at {}/{} bytes", path, transferred, total);
                return Err(DomainError::ObjectStoreError(format!(
                    "upload interrupted at {} of {} bytes",
                    transferred, total
                )));
            }
            transferred = (transferred + chunk).min(total);
            progress.report(UploadProgress::new(transferred, total));
            tokio::task::yield_now().await;
        }

        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(DomainError::ObjectStoreError("upload rejected".to_string()));
        }

        self.objects.insert(path.to_string(), bytes);
        info!("Stored object {} ({} bytes)", path, total);
        Ok(StoredObject {
            path: path.to_string(),
            size: total,
        })
    }

    async fn resolve_url(&self, object: &StoredObject) -> Result<String, DomainError> {
        if !self.objects.contains_key(&object.path) {
            return Err(DomainError::ObjectStoreError(format!(
                "object not found: {}",
                object.path
            )));
        }
        Ok(format!(
            "{}/{}",
            self.settings.public_base_url.trim_end_matches('/'),
            object.path
        ))
    }

    async fn delete(&self, path: &str) -> Result<(), DomainError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(DomainError::ObjectStoreError(format!(
                "delete of {} rejected",
                path
            )));
        }
        match self.objects.remove(path) {
            Some(_) => {
                debug!("Removed object {}", path);
                Ok(())
            }
            None => Err(DomainError::ObjectStoreError(format!(
                "object not found: {}",
                path
            ))),
        }
    }

    async fn fetch(&self, path: &str) -> Result<Option<Bytes>, DomainError> {
        Ok(self.objects.get(path).map(|entry| entry.value().clone()))
    }
}
