// ============================================================================
// Menu Core - Menu Item Lifecycle Service
// File: crates/menu-core/src/services/lifecycle_service.rs
// ============================================================================
//! Create, update, delete and list menu items while keeping each document
//! and its stored image consistent.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use chrono::Utc;
use menu_shared::constants::MENU_ITEMS_STORAGE_ROOT;
use menu_shared::utils::image_storage_path;
use tracing::{debug, error, info, warn};

use crate::domain::{
    CategoryCatalog, CategoryFilter, ImageRef, ImageUpload, MenuItem, MenuItemFields, OrphanKind,
    OrphanRecord,
};
use crate::error::DomainError;
use crate::repositories::{
    DocumentStore, ObjectStore, ProgressReporter, ReconciliationLog, UploadProgress,
};
use crate::services::event_bus::{EventBus, MenuEvent};
use crate::services::menu_browser::MenuBrowser;
use crate::services::mutation_guard::MutationGuard;

#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    pub collection: String,
    pub max_image_bytes: usize,
}

/// Orchestrates the document store and the object store for menu items.
///
/// Steps of one operation run strictly in order; nothing is retried and
/// nothing spans the two stores transactionally.
pub struct MenuItemLifecycle {
    documents: Arc<dyn DocumentStore>,
    objects: Arc<dyn ObjectStore>,
    reconciliation: Arc<dyn ReconciliationLog>,
    catalog: Arc<CategoryCatalog>,
    events: Arc<EventBus>,
    guard: MutationGuard,
    settings: LifecycleSettings,
}

impl MenuItemLifecycle {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        objects: Arc<dyn ObjectStore>,
        reconciliation: Arc<dyn ReconciliationLog>,
        catalog: Arc<CategoryCatalog>,
        events: Arc<EventBus>,
        settings: LifecycleSettings,
    ) -> Self {
        Self {
            documents,
            objects,
            reconciliation,
            catalog,
            events,
            guard: MutationGuard::new(),
            settings,
        }
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Add a menu item, uploading its image first when one is supplied.
    pub async fn create<F>(
        &self,
        fields: MenuItemFields,
        image: Option<ImageUpload>,
        on_progress: F,
    ) -> Result<MenuItem, DomainError>
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        // Validation never reaches a store
        let fields = fields.normalized(&self.catalog)?;
        let image = self.validate_image(image)?;

        info!("Creating menu item '{}' in {}", fields.name, fields.category);

        // 1. Reserve the id so the storage path can be derived before any write
        let id = self
            .documents
            .create_id(&self.settings.collection)
            .await
            .map_err(|e| {
                error!("Failed to reserve menu item id: {}", e);
                e
            })?;
        let _permit = self.guard.try_acquire(&id)?;

        // 2. Upload the image
        let image_ref = match image {
            Some((filename, bytes)) => {
                match self.upload_image(&id, &filename, bytes, on_progress).await {
                    Ok(image_ref) => Some(image_ref),
                    Err(e) => {
                        self.publish_failure(&id, "create", &e);
                        return Err(e);
                    }
                }
            }
            None => None,
        };

        // 3. Write the document
        let item = MenuItem::new(id.clone(), fields, image_ref, Utc::now());
        if let Err(e) = self
            .documents
            .set(&self.settings.collection, &id, item.to_document())
            .await
        {
            error!("Failed to write menu item {}: {}", id, e);
            if let Some(image) = item.image() {
                self.rollback_upload(&id, &image.path, &e).await;
            }
            self.publish_failure(&id, "create", &e);
            return Err(e);
        }

        info!("Menu item {} created", id);
        self.events.publish(MenuEvent::ItemCreated { item_id: id });
        Ok(item)
    }

    /// Change name, price, category and optionally replace the image.
    ///
    /// `existing_image_path` is the path the caller last saw; the old object
    /// is released only after the new one is stored.
    pub async fn update<F>(
        &self,
        id: &str,
        fields: MenuItemFields,
        image: Option<ImageUpload>,
        existing_image_path: &str,
        on_progress: F,
    ) -> Result<MenuItem, DomainError>
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        let fields = fields.normalized(&self.catalog)?;
        let image = self.validate_image(image)?;
        let existing_image_path = existing_image_path.trim();
        self.check_owned_path(id, existing_image_path)?;

        let _permit = self.guard.try_acquire(id)?;
        info!("Updating menu item {}", id);

        let current = self
            .documents
            .get(&self.settings.collection, id)
            .await?
            .ok_or_else(|| DomainError::MenuItemNotFound(id.to_string()))?;
        let current = MenuItem::from_document(id, current)?;

        // 1. Upload the replacement
        let new_image = match image {
            Some((filename, bytes)) => {
                match self.upload_image(id, &filename, bytes, on_progress).await {
                    Ok(image_ref) => Some(image_ref),
                    Err(e) => {
                        self.publish_failure(id, "update", &e);
                        return Err(e);
                    }
                }
            }
            None => None,
        };

        // 2. Release the old object when the path changed (non-fatal)
        if let Some(image) = &new_image {
            if !existing_image_path.is_empty() && existing_image_path != image.path {
                self.release_image(id, existing_image_path, OrphanKind::StaleImage)
                    .await;
            } else {
                debug!("Image of {} overwritten in place at {}", id, image.path);
            }

            // Caller saw a different image than the one stored; keep track of the stored one.
            if !current.image_path.is_empty()
                && current.image_path != existing_image_path
                && current.image_path != image.path
            {
                warn!(
                    "Menu item {} references {} but caller supplied '{}'",
                    id, current.image_path, existing_image_path
                );
                self.reconciliation.record(OrphanRecord::new(
                    OrphanKind::StaleImage,
                    id,
                    current.image_path.clone(),
                    "replaced while caller held a stale image path",
                ));
            }
        }

        // 3./4. Carry the stored image forward unless replaced, then write
        let previous_path = current.image_path.clone();
        let mut item = current;
        item.name = fields.name;
        item.price = fields.price;
        item.category = fields.category;
        item.updated_at = Some(Utc::now());
        if let Some(image) = new_image.clone() {
            item.image_url = image.url;
            item.image_path = image.path;
        }

        if let Err(e) = self
            .documents
            .update(
                &self.settings.collection,
                id,
                item.patch_document(new_image.is_some()),
            )
            .await
        {
            error!("Failed to write update of menu item {}: {}", id, e);
            if let Some(image) = &new_image {
                if image.path != previous_path && image.path != existing_image_path {
                    self.rollback_upload(id, &image.path, &e).await;
                }
            }
            self.publish_failure(id, "update", &e);
            return Err(e);
        }

        info!("Menu item {} updated", id);
        self.events.publish(MenuEvent::ItemUpdated {
            item_id: id.to_string(),
            image_replaced: new_image.is_some(),
        });
        Ok(item)
    }

    /// Remove the item's image (best effort) and then its document.
    pub async fn delete(&self, id: &str, image_path: &str) -> Result<(), DomainError> {
        let image_path = image_path.trim();
        self.check_owned_path(id, image_path)?;

        let _permit = self.guard.try_acquire(id)?;
        info!("Deleting menu item {}", id);

        // 1. Image first; a failure leaves an orphan rather than an unreachable document
        if !image_path.is_empty() {
            self.release_image(id, image_path, OrphanKind::OrphanedOnDelete)
                .await;
        }

        // 2. Document
        if let Err(e) = self.documents.delete(&self.settings.collection, id).await {
            error!("Failed to delete menu item {}: {}", id, e);
            self.publish_failure(id, "delete", &e);
            return Err(e);
        }

        info!("Menu item {} deleted", id);
        self.events.publish(MenuEvent::ItemDeleted { item_id: id.to_string() });
        Ok(())
    }

    /// Whole collection ordered by creation time, then id.
    pub async fn list(&self) -> Result<Vec<MenuItem>, DomainError> {
        let documents = self
            .documents
            .get_all(&self.settings.collection)
            .await
            .map_err(|e| {
                error!("Failed to list menu items: {}", e);
                e
            })?;

        let mut items: Vec<MenuItem> = documents
            .into_iter()
            .filter_map(|(id, document)| match MenuItem::from_document(&id, document) {
                Ok(item) => {
                    if !item.has_consistent_image() {
                        warn!("Menu item {} has a dangling image reference", item.id);
                    }
                    Some(item)
                }
                Err(e) => {
                    warn!("Skipping unreadable menu item {}: {}", id, e);
                    None
                }
            })
            .collect();

        items.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        debug!("Listed {} menu items", items.len());
        Ok(items)
    }

    pub async fn list_filtered(&self, filter: &CategoryFilter) -> Result<Vec<MenuItem>, DomainError> {
        let items = self.list().await?;
        Ok(MenuBrowser::filter(&items, filter))
    }

    fn validate_image(
        &self,
        image: Option<ImageUpload>,
    ) -> Result<Option<(String, Bytes)>, DomainError> {
        image
            .map(|upload| {
                let filename = upload.validate(self.settings.max_image_bytes)?;
                Ok((filename, upload.bytes))
            })
            .transpose()
    }

    /// Paths handed in by callers must live under the item's own subtree.
    fn check_owned_path(&self, id: &str, path: &str) -> Result<(), DomainError> {
        if path.is_empty() {
            return Ok(());
        }
        let prefix = format!("{}/{}/", MENU_ITEMS_STORAGE_ROOT, id);
        match path.strip_prefix(&prefix) {
            Some(rest) if !rest.is_empty() && !rest.contains('/') => Ok(()),
            _ => Err(DomainError::ValidationError(format!(
                "image path '{}' does not belong to menu item {}",
                path, id
            ))),
        }
    }

    async fn upload_image<F>(
        &self,
        id: &str,
        filename: &str,
        bytes: Bytes,
        on_progress: F,
    ) -> Result<ImageRef, DomainError>
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        let path = image_storage_path(id, filename);
        let total = bytes.len();
        let reporter = self.progress_reporter(id, &path, on_progress);

        info!("Uploading {} ({} bytes)", path, total);
        reporter.report(UploadProgress::new(0, total));

        let object = self
            .objects
            .upload(&path, bytes, reporter.clone())
            .await
            .map_err(|e| {
                warn!("Upload of {} failed: {}", path, e);
                DomainError::UploadFailed(format!("{}: {}", path, e))
            })?;

        let url = match self.objects.resolve_url(&object).await {
            Ok(url) if !url.is_empty() => url,
            Ok(_) => {
                let e = DomainError::UploadFailed(format!("{}: empty download URL", path));
                self.rollback_upload(id, &path, &e).await;
                return Err(e);
            }
            Err(e) => {
                let e = DomainError::UploadFailed(format!("{}: {}", path, e));
                self.rollback_upload(id, &path, &e).await;
                return Err(e);
            }
        };

        reporter.report(UploadProgress::new(total, total));
        ImageRef::new(url, path)
    }

    /// Best-effort delete; failures go to the reconciliation log.
    async fn release_image(&self, id: &str, path: &str, kind: OrphanKind) -> bool {
        match self.objects.delete(path).await {
            Ok(()) => {
                debug!("Deleted image {} of menu item {}", path, id);
                true
            }
            Err(e) => {
                warn!("Could not delete image {} of menu item {} (continuing): {}", path, id, e);
                self.reconciliation
                    .record(OrphanRecord::new(kind, id, path, e.to_string()));
                false
            }
        }
    }

    /// Removes an upload that no document references.
    async fn rollback_upload(&self, id: &str, path: &str, cause: &DomainError) {
        warn!("Rolling back upload {} of menu item {}: {}", path, id, cause);
        if let Err(e) = self.objects.delete(path).await {
            error!("Rollback of {} failed: {}", path, e);
            self.reconciliation.record(OrphanRecord::new(
                OrphanKind::UnlinkedUpload,
                id,
                path,
                format!("{}; rollback failed: {}", cause, e),
            ));
        }
    }

    /// Forwards strictly increasing percentages to the caller and the event bus.
    fn progress_reporter<F>(&self, id: &str, path: &str, on_progress: F) -> ProgressReporter
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        let events = self.events.clone();
        let item_id = id.to_string();
        let image_path = path.to_string();
        let last = Mutex::new(None::<f64>);

        ProgressReporter::new(move |progress: UploadProgress| {
            let percent = progress.percent();
            {
                let mut last = last.lock().unwrap_or_else(|e| e.into_inner());
                if matches!(*last, Some(previous) if percent <= previous) {
                    return;
                }
                *last = Some(percent);
            }
            debug!("Upload {} at {:.1}%", image_path, percent);
            on_progress(percent);
            events.publish(MenuEvent::UploadProgress {
                item_id: item_id.clone(),
                image_path: image_path.clone(),
                percent,
            });
        })
    }

    fn publish_failure(&self, id: &str, operation: &str, error: &DomainError) {
        self.events.publish(MenuEvent::OperationFailed {
            item_id: id.to_string(),
            operation: operation.to_string(),
            error: error.to_string(),
        });
    }
}
