// ============================================================================
// Menu Infrastructure - Queued Reconciliation Log
// File: crates/menu-infrastructure/src/reconciliation/queued.rs
// ============================================================================
//! Non-blocking front for the reconciliation journal.
//!
//! `record` only enqueues; a background task drains the queue into the
//! journal so lifecycle operations never wait on it.

use std::sync::Arc;

use flume::{bounded, Receiver, Sender};
use tracing::{info, warn};

use menu_core::domain::OrphanRecord;
use menu_core::repositories::ReconciliationLog;

use super::journal::InMemoryReconciliationJournal;

#[derive(Clone)]
pub struct QueuedReconciliationLog {
    sender: Sender<OrphanRecord>,
}

impl QueuedReconciliationLog {
    /// Spawns the drain task on the current tokio runtime.
    pub fn spawn(journal: Arc<InMemoryReconciliationJournal>, queue_capacity: usize) -> Self {
        let (sender, receiver) = bounded(queue_capacity.max(1));
        info!("Initializing reconciliation log: queue={}", queue_capacity);

        tokio::spawn(async move {
            Self::worker_loop(journal, receiver).await;
        });

        Self { sender }
    }

    async fn worker_loop(journal: Arc<InMemoryReconciliationJournal>, receiver: Receiver<OrphanRecord>) {
        while let Ok(record) = receiver.recv_async().await {
            journal.append(record);
        }
        info!("Reconciliation worker shutting down (channel closed)");
    }

    pub fn pending(&self) -> usize {
        self.sender.len()
    }
}

impl ReconciliationLog for QueuedReconciliationLog {
    fn record(&self, record: OrphanRecord) {
        if let Err(e) = self.sender.try_send(record) {
            let record = e.into_inner();
            warn!(
                kind = record.kind.as_str(),
                item_id = %record.item_id,
                image_path = %record.image_path,
                "Reconciliation queue full, orphan dropped"
            );
        }
    }
}
