//! At most one in-flight mutation per menu item id

use std::sync::Arc;
use std::time::Instant;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::error::DomainError;

#[derive(Clone, Default)]
pub struct MutationGuard {
    in_flight: Arc<DashMap<String, Instant>>,
}

impl MutationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `id` until the returned permit is dropped.
    pub fn try_acquire(&self, id: &str) -> Result<MutationPermit, DomainError> {
        match self.in_flight.entry(id.to_string()) {
            Entry::Occupied(entry) => {
                warn!(
                    "Rejecting mutation of {}: previous one running for {:?}",
                    id,
                    entry.get().elapsed()
                );
                Err(DomainError::MutationInProgress(id.to_string()))
            }
            Entry::Vacant(entry) => {
                entry.insert(Instant::now());
                debug!("Mutation permit acquired for {}", id);
                Ok(MutationPermit {
                    id: id.to_string(),
                    in_flight: self.in_flight.clone(),
                })
            }
        }
    }

    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight.contains_key(id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}

pub struct MutationPermit {
    id: String,
    in_flight: Arc<DashMap<String, Instant>>,
}

impl MutationPermit {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for MutationPermit {
    fn drop(&mut self) {
        self.in_flight.remove(&self.id);
    }
}
