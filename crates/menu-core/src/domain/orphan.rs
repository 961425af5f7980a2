//! Orphan-risk records for the reconciliation log

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanKind {
    /// Uploaded object never linked to a document (write failed, rollback failed).
    UnlinkedUpload,
    /// Replaced image whose deletion failed during an update.
    StaleImage,
    /// Image left behind when its item was deleted.
    OrphanedOnDelete,
}

impl OrphanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrphanKind::UnlinkedUpload => "unlinked_upload",
            OrphanKind::StaleImage => "stale_image",
            OrphanKind::OrphanedOnDelete => "orphaned_on_delete",
        }
    }
}

impl std::fmt::Display for OrphanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanRecord {
    pub kind: OrphanKind,
    pub item_id: String,
    pub image_path: String,
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
}

impl OrphanRecord {
    pub fn new(
        kind: OrphanKind,
        item_id: impl Into<String>,
        image_path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            item_id: item_id.into(),
            image_path: image_path.into(),
            reason: reason.into(),
            recorded_at: Utc::now(),
        }
    }
}
