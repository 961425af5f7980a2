//! Bounded record of orphan-risk events. A sweeper reads it through
//! `records`; once full, the oldest entries give way to new ones.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::warn;

use menu_core::domain::{OrphanKind, OrphanRecord};
use menu_core::repositories::ReconciliationLog;
use menu_shared::constants::DEFAULT_RECONCILIATION_JOURNAL_CAPACITY;

pub struct InMemoryReconciliationJournal {
    records: Mutex<VecDeque<OrphanRecord>>,
    capacity: usize,
}

impl Default for InMemoryReconciliationJournal {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RECONCILIATION_JOURNAL_CAPACITY)
    }
}

impl InMemoryReconciliationJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn append(&self, record: OrphanRecord) {
        warn!(
            kind = record.kind.as_str(),
            item_id = %record.item_id,
            image_path = %record.image_path,
            reason = %record.reason,
            "Orphan recorded"
        );
        let mut records = self.records.lock();
        if records.len() >= self.capacity {
            if let Some(dropped) = records.pop_front() {
                warn!(
                    item_id = %dropped.item_id,
                    image_path = %dropped.image_path,
                    "Reconciliation journal full, dropped oldest record"
                );
            }
        }
        records.push_back(record);
    }

    pub fn records(&self) -> Vec<OrphanRecord> {
        self.records.lock().iter().cloned().collect()
    }

    pub fn of_kind(&self, kind: OrphanKind) -> Vec<OrphanRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl ReconciliationLog for InMemoryReconciliationJournal {
    fn record(&self, record: OrphanRecord) {
        self.append(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_by_kind() {
        let journal = InMemoryReconciliationJournal::new();
        journal.record(OrphanRecord::new(OrphanKind::StaleImage, "1", "menuItems/1/a.jpg", "denied"));
        journal.record(OrphanRecord::new(OrphanKind::OrphanedOnDelete, "2", "menuItems/2/b.jpg", "denied"));

        assert_eq!(journal.len(), 2);
        let stale = journal.of_kind(OrphanKind::StaleImage);
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].item_id, "1");
    }

    #[test]
    fn test_full_journal_drops_oldest() {
        let journal = InMemoryReconciliationJournal::with_capacity(2);
        for id in ["1", "2", "3"] {
            journal.record(OrphanRecord::new(
                OrphanKind::StaleImage,
                id,
                format!("menuItems/{}/a.jpg", id),
                "denied",
            ));
        }

        let ids: Vec<String> = journal.records().into_iter().map(|r| r.item_id).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }
}
